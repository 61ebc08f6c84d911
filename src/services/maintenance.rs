//! Maintenance command handlers.
//!
//! The [`MaintenanceService`] owns the command surface: each handler
//! snapshots the account directory, drives a routine through the batch
//! runner where the command is batch-shaped, and appends the outcome to
//! the run history. Failures are contained per command; handlers report
//! `false` instead of propagating errors.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::MaintenanceSettings;
use crate::domain::{Account, EventKind, Folder};

use super::adapter::{CompletionHandle, Dispatch};
use super::batch::{BatchRunner, MaintenanceRoutine};
use super::enumerator;
use super::history::RunHistory;

/// Read access to the host's account/folder tree.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Takes a point-in-time snapshot of all configured accounts, in the
    /// host's display order.
    async fn accounts(&self) -> Result<Vec<Account>>;
}

/// The host's maintenance-primitive bridge.
///
/// Resolved once at startup. Hosts without the privileged bridge resolve
/// to `None`, and every handler degrades to a `false` outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceHost: Send + Sync {
    /// Starts compaction of one folder. A started primitive fires the
    /// completion handle exactly once when it finishes.
    fn begin_compact(&self, folder: &Folder, completion: CompletionHandle) -> Result<Dispatch>;

    /// Starts an index repair of one folder, same completion contract as
    /// [`begin_compact`](Self::begin_compact).
    fn begin_repair(&self, folder: &Folder, completion: CompletionHandle) -> Result<Dispatch>;

    /// Clears persisted folder-pane state.
    async fn reset_folder_pane(&self) -> Result<bool>;

    /// Reloads each address-book directory, returning how many were
    /// refreshed.
    async fn refresh_address_books(&self) -> Result<usize>;

    /// Kicks off a full search-index rebuild.
    async fn rebuild_search_index(&self) -> Result<bool>;
}

/// Compaction routine over the host bridge.
struct CompactRoutine {
    host: Arc<dyn MaintenanceHost>,
    bound: Option<Duration>,
}

impl MaintenanceRoutine for CompactRoutine {
    fn is_eligible(&self, folder: &Folder) -> bool {
        folder.can_compact
    }

    fn begin(&self, folder: &Folder, completion: CompletionHandle) -> Result<Dispatch> {
        self.host.begin_compact(folder, completion)
    }

    fn bound(&self) -> Option<Duration> {
        self.bound
    }
}

/// Index-repair routine over the host bridge. Virtual folders have no
/// backing index and are skipped.
struct RepairRoutine {
    host: Arc<dyn MaintenanceHost>,
    bound: Option<Duration>,
}

impl MaintenanceRoutine for RepairRoutine {
    fn is_eligible(&self, folder: &Folder) -> bool {
        !folder.is_virtual
    }

    fn begin(&self, folder: &Folder, completion: CompletionHandle) -> Result<Dispatch> {
        self.host.begin_repair(folder, completion)
    }

    fn bound(&self) -> Option<Duration> {
        self.bound
    }
}

/// Command handlers for the maintenance surface.
pub struct MaintenanceService {
    directory: Arc<dyn AccountDirectory>,
    host: Option<Arc<dyn MaintenanceHost>>,
    history: Arc<RunHistory>,
    settings: MaintenanceSettings,
}

impl MaintenanceService {
    /// Creates the service. `host` is the maintenance capability resolved
    /// once at startup; it is never re-probed per call.
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        host: Option<Arc<dyn MaintenanceHost>>,
        history: Arc<RunHistory>,
        settings: MaintenanceSettings,
    ) -> Self {
        Self {
            directory,
            host,
            history,
            settings,
        }
    }

    /// Whether a maintenance bridge resolved at startup.
    pub fn has_maintenance_capability(&self) -> bool {
        self.host.is_some()
    }

    /// Compacts every compactable folder, one at a time, under a
    /// wall-clock budget. Folders not reached when the budget runs out
    /// are left untouched for a later run.
    ///
    /// Returns `true` iff the batch ran without an infrastructure-level
    /// failure; a truncated run still counts as having run.
    pub async fn run_compaction_batch(&self, max_runtime: Option<Duration>) -> bool {
        let Some(host) = &self.host else {
            self.history
                .record(EventKind::CompactUnavailable, None)
                .await;
            return false;
        };
        let accounts = match self.directory.accounts().await {
            Ok(accounts) => accounts,
            Err(error) => {
                warn!(%error, "account snapshot failed");
                self.history.record(EventKind::CompactError, None).await;
                return false;
            }
        };

        let budget = max_runtime.unwrap_or(self.settings.compaction_budget);
        let deadline = Instant::now() + budget;
        let folders = enumerator::enumerate(&accounts);
        let routine = CompactRoutine {
            host: Arc::clone(host),
            bound: self.settings.routine_bound,
        };

        let report = BatchRunner::new()
            .run(&folders, &routine, Some(deadline))
            .await;
        info!(
            discovered = report.discovered,
            compacted = report.succeeded,
            truncated = report.truncated_by_deadline,
            "compaction batch finished"
        );
        self.history
            .record(EventKind::CompactRun, Some(report.succeeded))
            .await;
        true
    }

    /// Clears persisted folder-pane state so the host rebuilds it.
    pub async fn reset_pane_state(&self) -> bool {
        let Some(host) = &self.host else {
            self.history.record(EventKind::PaneReset, Some(0)).await;
            return false;
        };
        match host.reset_folder_pane().await {
            Ok(reset) => {
                self.history
                    .record(EventKind::PaneReset, Some(usize::from(reset)))
                    .await;
                reset
            }
            Err(error) => {
                warn!(%error, "pane reset failed");
                self.history.record(EventKind::PaneResetError, None).await;
                false
            }
        }
    }

    /// Reloads the host's address-book directories.
    pub async fn refresh_directory_cache(&self) -> bool {
        let Some(host) = &self.host else {
            self.history.record(EventKind::DirectoryRefresh, None).await;
            return false;
        };
        match host.refresh_address_books().await {
            Ok(refreshed) => {
                self.history
                    .record(EventKind::DirectoryRefresh, Some(refreshed))
                    .await;
                true
            }
            Err(error) => {
                warn!(%error, "directory refresh failed");
                self.history
                    .record(EventKind::DirectoryRefreshError, None)
                    .await;
                false
            }
        }
    }

    /// Repairs the message index of every non-virtual folder. Unlike
    /// compaction this walk is unbudgeted; it visits the whole list.
    pub async fn repair_indexes(&self) -> bool {
        let Some(host) = &self.host else {
            self.history.record(EventKind::IndexRepair, None).await;
            return false;
        };
        let accounts = match self.directory.accounts().await {
            Ok(accounts) => accounts,
            Err(error) => {
                warn!(%error, "account snapshot failed");
                self.history.record(EventKind::IndexRepairError, None).await;
                return false;
            }
        };

        let folders = enumerator::enumerate(&accounts);
        let routine = RepairRoutine {
            host: Arc::clone(host),
            bound: self.settings.routine_bound,
        };

        let report = BatchRunner::new().run(&folders, &routine, None).await;
        info!(
            discovered = report.discovered,
            repaired = report.succeeded,
            "index repair finished"
        );
        self.history
            .record(EventKind::IndexRepair, Some(report.succeeded))
            .await;
        true
    }

    /// Kicks off a full search-index rebuild.
    pub async fn rebuild_search_index(&self) -> bool {
        let Some(host) = &self.host else {
            self.history.record(EventKind::SearchRebuild, Some(0)).await;
            return false;
        };
        match host.rebuild_search_index().await {
            Ok(started) => {
                self.history
                    .record(EventKind::SearchRebuild, Some(usize::from(started)))
                    .await;
                started
            }
            Err(error) => {
                warn!(%error, "search rebuild failed");
                self.history
                    .record(EventKind::SearchRebuildError, None)
                    .await;
                false
            }
        }
    }

    /// Records that the caller enumerated the installed add-ons.
    pub async fn note_addons_checked(&self, count: usize) -> bool {
        self.history
            .record(EventKind::AddonsChecked, Some(count))
            .await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HistoryEvent;
    use anyhow::anyhow;

    fn tree() -> Vec<Account> {
        let root = Folder::new("/", "Root").with_children(vec![
            Folder::new("/INBOX", "Inbox"),
            Folder::new("/Search", "Search"),
        ]);
        vec![Account::new("acct-1", "Work", root)]
    }

    fn directory_with(accounts: Vec<Account>) -> Arc<MockAccountDirectory> {
        let mut directory = MockAccountDirectory::new();
        directory
            .expect_accounts()
            .returning(move || Ok(accounts.clone()));
        Arc::new(directory)
    }

    fn service(
        directory: Arc<MockAccountDirectory>,
        host: Option<Arc<MockMaintenanceHost>>,
    ) -> MaintenanceService {
        MaintenanceService::new(
            directory,
            host.map(|h| h as Arc<dyn MaintenanceHost>),
            Arc::new(RunHistory::new()),
            MaintenanceSettings::default(),
        )
    }

    async fn last_event(service: &MaintenanceService) -> HistoryEvent {
        service
            .history
            .recent()
            .await
            .last()
            .cloned()
            .expect("handler should have recorded an event")
    }

    #[tokio::test]
    async fn compaction_without_capability_records_unavailable() {
        let service = service(Arc::new(MockAccountDirectory::new()), None);

        assert!(!service.run_compaction_batch(None).await);

        let event = last_event(&service).await;
        assert_eq!(event.kind, EventKind::CompactUnavailable);
        assert_eq!(event.count, None);
    }

    #[tokio::test]
    async fn compaction_counts_compacted_folders() {
        let mut accounts = tree();
        accounts[0].root.as_mut().unwrap().children[1].can_compact = false;

        let mut host = MockMaintenanceHost::new();
        host.expect_begin_compact()
            .times(2)
            .returning(|_, completion| {
                completion.fire();
                Ok(Dispatch::Started)
            });

        let service = service(directory_with(accounts), Some(Arc::new(host)));

        assert!(service.run_compaction_batch(None).await);

        let event = last_event(&service).await;
        assert_eq!(event.kind, EventKind::CompactRun);
        assert_eq!(event.count, Some(2));
    }

    #[tokio::test]
    async fn compaction_directory_error_is_contained() {
        let mut directory = MockAccountDirectory::new();
        directory
            .expect_accounts()
            .returning(|| Err(anyhow!("host session closed")));
        let host = MockMaintenanceHost::new();

        let service = service(Arc::new(directory), Some(Arc::new(host)));

        assert!(!service.run_compaction_batch(None).await);
        assert_eq!(last_event(&service).await.kind, EventKind::CompactError);
    }

    #[tokio::test]
    async fn compaction_failure_on_one_folder_still_reports_a_run() {
        let mut host = MockMaintenanceHost::new();
        let mut call = 0;
        host.expect_begin_compact()
            .times(3)
            .returning(move |_, completion| {
                call += 1;
                if call == 2 {
                    return Err(anyhow!("folder locked"));
                }
                completion.fire();
                Ok(Dispatch::Started)
            });

        let service = service(directory_with(tree()), Some(Arc::new(host)));

        assert!(service.run_compaction_batch(None).await);

        let event = last_event(&service).await;
        assert_eq!(event.kind, EventKind::CompactRun);
        assert_eq!(event.count, Some(2));
    }

    #[tokio::test]
    async fn pane_reset_reports_host_outcome() {
        let mut host = MockMaintenanceHost::new();
        host.expect_reset_folder_pane().returning(|| Ok(true));

        let service = service(Arc::new(MockAccountDirectory::new()), Some(Arc::new(host)));

        assert!(service.reset_pane_state().await);

        let event = last_event(&service).await;
        assert_eq!(event.kind, EventKind::PaneReset);
        assert_eq!(event.count, Some(1));
    }

    #[tokio::test]
    async fn pane_reset_error_records_distinct_event() {
        let mut host = MockMaintenanceHost::new();
        host.expect_reset_folder_pane()
            .returning(|| Err(anyhow!("prefs unavailable")));

        let service = service(Arc::new(MockAccountDirectory::new()), Some(Arc::new(host)));

        assert!(!service.reset_pane_state().await);
        assert_eq!(last_event(&service).await.kind, EventKind::PaneResetError);
    }

    #[tokio::test]
    async fn pane_reset_without_capability_counts_zero() {
        let service = service(Arc::new(MockAccountDirectory::new()), None);

        assert!(!service.reset_pane_state().await);

        let event = last_event(&service).await;
        assert_eq!(event.kind, EventKind::PaneReset);
        assert_eq!(event.count, Some(0));
    }

    #[tokio::test]
    async fn directory_refresh_counts_directories() {
        let mut host = MockMaintenanceHost::new();
        host.expect_refresh_address_books().returning(|| Ok(3));

        let service = service(Arc::new(MockAccountDirectory::new()), Some(Arc::new(host)));

        assert!(service.refresh_directory_cache().await);

        let event = last_event(&service).await;
        assert_eq!(event.kind, EventKind::DirectoryRefresh);
        assert_eq!(event.count, Some(3));
    }

    #[tokio::test]
    async fn directory_refresh_without_capability_has_blank_count() {
        let service = service(Arc::new(MockAccountDirectory::new()), None);

        assert!(!service.refresh_directory_cache().await);

        let event = last_event(&service).await;
        assert_eq!(event.kind, EventKind::DirectoryRefresh);
        assert_eq!(event.count, None);
    }

    #[tokio::test]
    async fn repair_skips_virtual_folders() {
        let mut accounts = tree();
        accounts[0].root.as_mut().unwrap().children[1].is_virtual = true;

        let mut host = MockMaintenanceHost::new();
        host.expect_begin_repair()
            .times(2)
            .returning(|_, completion| {
                completion.fire();
                Ok(Dispatch::Started)
            });

        let service = service(directory_with(accounts), Some(Arc::new(host)));

        assert!(service.repair_indexes().await);

        let event = last_event(&service).await;
        assert_eq!(event.kind, EventKind::IndexRepair);
        assert_eq!(event.count, Some(2));
    }

    #[tokio::test]
    async fn search_rebuild_reflects_host_answer() {
        let mut host = MockMaintenanceHost::new();
        host.expect_rebuild_search_index().returning(|| Ok(false));

        let service = service(Arc::new(MockAccountDirectory::new()), Some(Arc::new(host)));

        assert!(!service.rebuild_search_index().await);

        let event = last_event(&service).await;
        assert_eq!(event.kind, EventKind::SearchRebuild);
        assert_eq!(event.count, Some(0));
    }

    #[tokio::test]
    async fn addons_checked_is_always_recorded() {
        let service = service(Arc::new(MockAccountDirectory::new()), None);

        assert!(service.note_addons_checked(7).await);

        let event = last_event(&service).await;
        assert_eq!(event.kind, EventKind::AddonsChecked);
        assert_eq!(event.count, Some(7));
    }
}
