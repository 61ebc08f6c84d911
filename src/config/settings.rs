//! Application settings and configuration types.
//!
//! Settings are serialized as JSON and loaded from an explicit path the
//! host hands in at startup.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Top-level application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Maintenance batch configuration.
    pub maintenance: MaintenanceSettings,
}

/// Errors from settings persistence.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON for this schema.
    #[error("settings format error: {0}")]
    Format(#[from] serde_json::Error),
}

impl Settings {
    /// Loads settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Loads settings, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(error) => {
                warn!(%error, path = %path.display(), "using default settings");
                Self::default()
            }
        }
    }

    /// Writes settings to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Settings for maintenance batch runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceSettings {
    /// Wall-clock budget for one compaction batch. Folders not reached
    /// when the budget runs out are left untouched.
    #[serde(with = "duration_serde")]
    pub compaction_budget: Duration,
    /// Optional bound on a single started primitive. `None` waits
    /// indefinitely for the completion signal.
    #[serde(default, with = "opt_duration_serde")]
    pub routine_bound: Option<Duration>,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            compaction_budget: Duration::from_secs(150),
            routine_bound: None,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

mod opt_duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
