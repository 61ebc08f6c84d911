//! Integration tests for the maintenance engine.
//!
//! These tests drive the full command surface through [`App::dispatch`]
//! against scripted in-process providers. Each service module contains
//! its own unit tests for detailed logic.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use mailtend::app::{App, Command, CommandOutput};
use mailtend::config::Settings;
use mailtend::domain::{Account, Folder};
use mailtend::providers::{OfflineHost, StaticDirectory};
use mailtend::services::{
    AddonInfo, ApplicationInfo, CompletionHandle, Dispatch, HostInfo, MaintenanceHost,
    PlatformInfo,
};

/// Host bridge whose primitives complete immediately, except that
/// compacting `/Broken` fails to start.
struct ScriptedHost;

#[async_trait]
impl MaintenanceHost for ScriptedHost {
    fn begin_compact(&self, folder: &Folder, completion: CompletionHandle) -> Result<Dispatch> {
        if folder.path == "/Broken" {
            return Err(anyhow!("folder is locked"));
        }
        completion.fire();
        Ok(Dispatch::Started)
    }

    fn begin_repair(&self, _folder: &Folder, completion: CompletionHandle) -> Result<Dispatch> {
        completion.fire();
        Ok(Dispatch::Started)
    }

    async fn reset_folder_pane(&self) -> Result<bool> {
        Ok(true)
    }

    async fn refresh_address_books(&self) -> Result<usize> {
        Ok(2)
    }

    async fn rebuild_search_index(&self) -> Result<bool> {
        Ok(true)
    }
}

#[async_trait]
impl HostInfo for ScriptedHost {
    async fn application(&self) -> Result<ApplicationInfo> {
        Ok(ApplicationInfo {
            name: "Thunderbird".to_string(),
            version: "128.0".to_string(),
        })
    }

    async fn platform(&self) -> Result<PlatformInfo> {
        Ok(PlatformInfo {
            os: "linux".to_string(),
            arch: "x86-64".to_string(),
        })
    }

    async fn addons(&self) -> Result<Vec<AddonInfo>> {
        Ok(vec![AddonInfo {
            name: "Tidy".to_string(),
            version: "1.2".to_string(),
            enabled: true,
        }])
    }
}

fn sample_tree() -> Vec<Account> {
    let mut search = Folder::new("/Search", "Saved Search");
    search.can_compact = false;
    search.is_virtual = true;

    let root = Folder::new("/", "Root").with_counts(0, 0).with_children(vec![
        Folder::new("/INBOX", "Inbox").with_counts(120, 3),
        Folder::new("/Broken", "Broken"),
        search,
    ]);
    vec![Account::new("acct-1", "Work", root)]
}

fn connected_app() -> App {
    let host = Arc::new(ScriptedHost);
    App::new(
        Arc::new(StaticDirectory::new(sample_tree())),
        Some(host.clone()),
        host,
        Settings::default(),
    )
}

fn degraded_app() -> App {
    App::new(
        Arc::new(StaticDirectory::new(sample_tree())),
        None,
        Arc::new(OfflineHost),
        Settings::default(),
    )
}

async fn status(app: &App, command: Command) -> bool {
    match app.dispatch(command).await {
        CommandOutput::Status(status) => status,
        CommandOutput::Report(_) => panic!("expected a status"),
    }
}

async fn report(app: &App, selections: Vec<String>) -> String {
    match app
        .dispatch(Command::GenerateDiagnostics { selections })
        .await
    {
        CommandOutput::Report(report) => report,
        CommandOutput::Status(_) => panic!("expected a report"),
    }
}

// ============================================================================
// Connected host
// ============================================================================

#[tokio::test]
async fn full_command_sequence_records_history_in_order() {
    let app = connected_app();

    assert!(
        status(
            &app,
            Command::RunCompactionBatch {
                max_runtime_seconds: Some(120),
            },
        )
        .await
    );
    assert!(status(&app, Command::ResetPaneState).await);
    assert!(status(&app, Command::RefreshDirectoryCache).await);
    assert!(status(&app, Command::RepairIndexes).await);
    assert!(status(&app, Command::RebuildSearchIndex).await);

    let text = report(&app, vec!["Compact folders".to_string()]).await;
    let tail: Vec<&str> = text
        .lines()
        .skip_while(|line| *line != "Recent events:")
        .skip(1)
        .collect();

    // Root, Inbox and Broken are compactable; Broken fails to start.
    assert!(tail[0].contains(" compact_run 2"));
    assert!(tail[1].contains(" pane_reset 1"));
    assert!(tail[2].contains(" directory_refresh 2"));
    // The saved search is virtual and skipped by repair.
    assert!(tail[3].contains(" index_repair 3"));
    assert!(tail[4].contains(" search_rebuild 1"));
    assert_eq!(tail.len(), 5);
}

#[tokio::test]
async fn report_renders_host_identity_and_tree() {
    let app = connected_app();

    let text = report(&app, Vec::new()).await;

    assert!(text.contains("App: Thunderbird 128.0"));
    assert!(text.contains("Platform: linux x86-64"));
    assert!(text.contains("- Tidy 1.2 [enabled]"));
    assert!(text.contains("- Account: Work"));
    assert!(text.contains("- Inbox: 120 messages, 3 unread"));
    assert!(text.contains("- Broken: ? messages, ? unread"));
}

#[tokio::test]
async fn repeated_reports_render_identical_tree_sections() {
    let app = connected_app();

    let first = report(&app, Vec::new()).await;
    let second = report(&app, Vec::new()).await;

    let section = |text: &str| -> Vec<String> {
        text.lines()
            .skip_while(|line| *line != "Accounts and folders:")
            .take_while(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    };

    assert_eq!(section(&first), section(&second));
    assert!(!section(&first).is_empty());
}

// ============================================================================
// Degraded host (no maintenance bridge, no host session)
// ============================================================================

#[tokio::test]
async fn degraded_host_fails_every_status_command() {
    let app = degraded_app();

    assert!(
        !status(
            &app,
            Command::RunCompactionBatch {
                max_runtime_seconds: None,
            },
        )
        .await
    );
    assert!(!status(&app, Command::ResetPaneState).await);
    assert!(!status(&app, Command::RefreshDirectoryCache).await);
    assert!(!status(&app, Command::RepairIndexes).await);
    assert!(!status(&app, Command::RebuildSearchIndex).await);
}

#[tokio::test]
async fn degraded_host_still_renders_a_report() {
    let app = degraded_app();

    status(
        &app,
        Command::RunCompactionBatch {
            max_runtime_seconds: None,
        },
    )
    .await;

    let text = report(&app, Vec::new()).await;

    assert!(text.contains("App: unknown unknown"));
    assert!(text.contains("- Account: Work"));
    assert!(text.contains(" compact_unavailable "));
}
