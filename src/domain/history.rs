//! History event types.
//!
//! One [`HistoryEvent`] is appended per command invocation and surfaced
//! in diagnostics reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome category of one command invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A compaction batch finished; the count is the number of folders
    /// compacted.
    CompactRun,
    /// A compaction batch failed before or during the run.
    CompactError,
    /// Compaction was requested but no maintenance capability resolved.
    CompactUnavailable,
    /// Installed add-ons were enumerated; the count is how many.
    AddonsChecked,
    /// Folder-pane state was reset (count 1) or the reset reported
    /// nothing to do (count 0).
    PaneReset,
    /// The pane reset raised an error.
    PaneResetError,
    /// Address-book directories were refreshed; the count is how many.
    DirectoryRefresh,
    /// The directory refresh raised an error.
    DirectoryRefreshError,
    /// An index-repair walk finished; the count is the number of folders
    /// repaired.
    IndexRepair,
    /// The index-repair walk raised an error.
    IndexRepairError,
    /// A search-index rebuild was kicked off (count 1) or declined
    /// (count 0).
    SearchRebuild,
    /// The search-index rebuild raised an error.
    SearchRebuildError,
    /// A diagnostics report was rendered.
    DiagnosticsGenerated,
}

impl EventKind {
    /// The stable token rendered into diagnostics reports.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::CompactRun => "compact_run",
            EventKind::CompactError => "compact_error",
            EventKind::CompactUnavailable => "compact_unavailable",
            EventKind::AddonsChecked => "addons_checked",
            EventKind::PaneReset => "pane_reset",
            EventKind::PaneResetError => "pane_reset_error",
            EventKind::DirectoryRefresh => "directory_refresh",
            EventKind::DirectoryRefreshError => "directory_refresh_error",
            EventKind::IndexRepair => "index_repair",
            EventKind::IndexRepairError => "index_repair_error",
            EventKind::SearchRebuild => "search_rebuild",
            EventKind::SearchRebuildError => "search_rebuild_error",
            EventKind::DiagnosticsGenerated => "diagnostics_generated",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timestamped record of one command's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// When the command finished.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub kind: EventKind,
    /// An optional per-event count (folders compacted, add-ons seen, ...).
    pub count: Option<usize>,
}

impl HistoryEvent {
    /// Creates an event stamped with the current time.
    pub fn new(kind: EventKind, count: Option<usize>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            count,
        }
    }
}
