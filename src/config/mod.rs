//! Configuration and settings management.
//!
//! This module provides application settings types and JSON persistence.

mod settings;

pub use settings::{MaintenanceSettings, Settings, SettingsError};
