//! Diagnostics report compiler.
//!
//! Renders the stable, line-oriented report consumed by the external
//! viewer: a header block, the selected routine names, the add-on list,
//! the account/folder tree, and the recent history tail.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::EventKind;

use super::enumerator;
use super::history::RunHistory;
use super::maintenance::AccountDirectory;

/// Application identification reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationInfo {
    /// Application name, e.g. the mail client's brand name.
    pub name: String,
    /// Application version string.
    pub version: String,
}

impl ApplicationInfo {
    fn unknown() -> Self {
        Self {
            name: "unknown".to_string(),
            version: "unknown".to_string(),
        }
    }
}

/// Operating platform reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Operating system identifier.
    pub os: String,
    /// Processor architecture identifier.
    pub arch: String,
}

impl PlatformInfo {
    fn unknown() -> Self {
        Self {
            os: "unknown".to_string(),
            arch: "unknown".to_string(),
        }
    }
}

/// One installed add-on, as listed by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonInfo {
    /// Add-on display name.
    pub name: String,
    /// Add-on version string.
    pub version: String,
    /// Whether the add-on is currently enabled.
    pub enabled: bool,
}

/// Read access to host metadata for report headers.
///
/// Every read is fallible; the reporter substitutes `unknown` fields or
/// empty lists rather than failing the report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostInfo: Send + Sync {
    /// The hosting application's identification.
    async fn application(&self) -> Result<ApplicationInfo>;

    /// The operating platform.
    async fn platform(&self) -> Result<PlatformInfo>;

    /// Installed add-ons, in the host's listing order.
    async fn addons(&self) -> Result<Vec<AddonInfo>>;
}

/// Product name/version stamped into report headers.
#[derive(Debug, Clone)]
pub struct ProductInfo {
    /// Product name, used for the report title line.
    pub name: String,
    /// Product version string.
    pub version: String,
}

impl Default for ProductInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Compiles diagnostics text from the snapshot tree and history log.
pub struct DiagnosticsReporter {
    directory: Arc<dyn AccountDirectory>,
    host_info: Arc<dyn HostInfo>,
    history: Arc<RunHistory>,
    product: ProductInfo,
}

impl DiagnosticsReporter {
    /// Creates the reporter with the default product stamp.
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        host_info: Arc<dyn HostInfo>,
        history: Arc<RunHistory>,
    ) -> Self {
        Self {
            directory,
            host_info,
            history,
            product: ProductInfo::default(),
        }
    }

    /// Renders the full report, then records the command in the history
    /// log. The rendered text therefore never contains its own event.
    pub async fn generate(&self, selections: &[String]) -> String {
        let report = self.render(selections).await;
        self.history
            .record(EventKind::DiagnosticsGenerated, None)
            .await;
        report
    }

    async fn render(&self, selections: &[String]) -> String {
        let application = self
            .host_info
            .application()
            .await
            .unwrap_or_else(|_| ApplicationInfo::unknown());
        let platform = self
            .host_info
            .platform()
            .await
            .unwrap_or_else(|_| PlatformInfo::unknown());
        let addons = self.host_info.addons().await.unwrap_or_default();
        let accounts = self.directory.accounts().await.unwrap_or_default();

        let mut lines: Vec<String> = Vec::new();
        lines.push(format!("{} Diagnostics", self.product.name));
        lines.push("--------------------".to_string());
        lines.push(format!("Generated: {}", timestamp(Utc::now())));
        lines.push(format!("App: {} {}", application.name, application.version));
        lines.push(format!("Platform: {} {}", platform.os, platform.arch));
        lines.push(format!(
            "Product: {} {}",
            self.product.name, self.product.version
        ));
        lines.push(String::new());

        lines.push("Routines selected this run:".to_string());
        if selections.is_empty() {
            lines.push("- (not provided)".to_string());
        } else {
            for selection in selections {
                lines.push(format!("- {selection}"));
            }
        }
        lines.push(String::new());

        lines.push("Add-ons:".to_string());
        for addon in &addons {
            let state = if addon.enabled { "enabled" } else { "disabled" };
            lines.push(format!("- {} {} [{state}]", addon.name, addon.version));
        }
        lines.push(String::new());

        if !accounts.is_empty() {
            lines.push("Accounts and folders:".to_string());
            for account in &accounts {
                lines.push(format!("- Account: {}", account.name));
                for folder in enumerator::account_folders(account) {
                    let indent = "  ".repeat(folder.path.split('/').count());
                    let total = count_or_unknown(folder.total_messages);
                    let unread = count_or_unknown(folder.unread_messages);
                    lines.push(format!(
                        "{indent}- {}: {total} messages, {unread} unread",
                        folder.name
                    ));
                }
            }
            lines.push(String::new());
        }

        lines.push("Recent events:".to_string());
        for event in self.history.recent().await {
            let count = event
                .count
                .map_or_else(String::new, |count| count.to_string());
            lines.push(format!(
                "- {} {} {count}",
                timestamp(event.timestamp),
                event.kind
            ));
        }
        lines.join("\n")
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn count_or_unknown(count: Option<u32>) -> String {
    count.map_or_else(|| "?".to_string(), |count| count.to_string())
}
