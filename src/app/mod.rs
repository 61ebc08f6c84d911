//! Application wiring and command dispatch.
//!
//! [`App`] owns the process-lifetime state (the run history and the
//! capability handle resolved at startup) and routes commands from the
//! external transport to their handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::services::{
    AccountDirectory, DiagnosticsReporter, HostInfo, MaintenanceHost, MaintenanceService,
    RunHistory,
};

/// A request from the command transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compact all compactable folders under a wall-clock budget.
    RunCompactionBatch {
        /// Budget override in seconds; `None` uses the configured budget.
        max_runtime_seconds: Option<u64>,
    },
    /// Clear persisted folder-pane state.
    ResetPaneState,
    /// Reload the host's address-book directories.
    RefreshDirectoryCache,
    /// Repair the message index of every non-virtual folder.
    RepairIndexes,
    /// Kick off a full search-index rebuild.
    RebuildSearchIndex,
    /// Render a diagnostics report.
    GenerateDiagnostics {
        /// Names of the routines the user selected this run.
        selections: Vec<String>,
    },
}

/// A response to the command transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Whether the command ran without an infrastructure-level failure.
    Status(bool),
    /// Rendered diagnostics text.
    Report(String),
}

/// Application root.
///
/// Builds the service graph once: the maintenance capability is resolved
/// here at startup and handed to the handlers as a typed option, never
/// re-probed per call.
pub struct App {
    maintenance: MaintenanceService,
    diagnostics: DiagnosticsReporter,
    history: Arc<RunHistory>,
}

impl App {
    /// Wires the services against the given host collaborators.
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        maintenance_host: Option<Arc<dyn MaintenanceHost>>,
        host_info: Arc<dyn HostInfo>,
        settings: Settings,
    ) -> Self {
        let history = Arc::new(RunHistory::new());
        let maintenance = MaintenanceService::new(
            Arc::clone(&directory),
            maintenance_host,
            Arc::clone(&history),
            settings.maintenance,
        );
        let diagnostics =
            DiagnosticsReporter::new(directory, host_info, Arc::clone(&history));
        Self {
            maintenance,
            diagnostics,
            history,
        }
    }

    /// Routes one command to its handler.
    pub async fn dispatch(&self, command: Command) -> CommandOutput {
        match command {
            Command::RunCompactionBatch {
                max_runtime_seconds,
            } => CommandOutput::Status(
                self.maintenance
                    .run_compaction_batch(max_runtime_seconds.map(Duration::from_secs))
                    .await,
            ),
            Command::ResetPaneState => {
                CommandOutput::Status(self.maintenance.reset_pane_state().await)
            }
            Command::RefreshDirectoryCache => {
                CommandOutput::Status(self.maintenance.refresh_directory_cache().await)
            }
            Command::RepairIndexes => {
                CommandOutput::Status(self.maintenance.repair_indexes().await)
            }
            Command::RebuildSearchIndex => {
                CommandOutput::Status(self.maintenance.rebuild_search_index().await)
            }
            Command::GenerateDiagnostics { selections } => {
                CommandOutput::Report(self.diagnostics.generate(&selections).await)
            }
        }
    }

    /// The command handlers, for callers that bypass [`dispatch`](Self::dispatch).
    pub fn maintenance(&self) -> &MaintenanceService {
        &self.maintenance
    }

    /// The report compiler.
    pub fn diagnostics(&self) -> &DiagnosticsReporter {
        &self.diagnostics
    }

    /// The process-lifetime history log.
    pub fn history(&self) -> &Arc<RunHistory> {
        &self.history
    }
}
