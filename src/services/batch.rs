//! Budgeted sequential execution of maintenance routines.
//!
//! The [`BatchRunner`] drives an enumerated folder list through one
//! [`MaintenanceRoutine`] under an optional wall-clock deadline,
//! aggregating counts and truncating when the deadline passes.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{Folder, FolderId};

use super::adapter::{self, CompletionHandle, Dispatch};

/// One maintenance operation applied across many folders.
///
/// Implementations wrap a single host primitive (compact, repair) and
/// its eligibility predicate.
pub trait MaintenanceRoutine: Send + Sync {
    /// Whether this routine applies to the given folder at all.
    /// Ineligible folders are skipped, never attempted.
    fn is_eligible(&self, folder: &Folder) -> bool;

    /// Starts the primitive for one folder. A started primitive fires
    /// the completion handle exactly once when it finishes.
    fn begin(&self, folder: &Folder, completion: CompletionHandle) -> Result<Dispatch>;

    /// Optional wall-clock bound for a single started primitive. `None`
    /// waits indefinitely for the completion signal.
    fn bound(&self) -> Option<Duration> {
        None
    }
}

/// Lifecycle of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPhase {
    /// No run has started.
    #[default]
    Idle,
    /// A run is in progress.
    Running,
    /// The run visited every folder in the list.
    Completed,
    /// The run stopped at the deadline with folders left untouched.
    DeadlineExceeded,
}

/// Per-folder outcome record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    /// The folder this outcome belongs to.
    pub folder: FolderId,
    /// Whether the routine was invoked for this folder.
    pub attempted: bool,
    /// Whether the invocation resolved successfully.
    pub succeeded: bool,
}

/// Aggregate result of one batch run.
///
/// `outcomes` holds one record per folder reached before the deadline;
/// folders past the stopping point appear in no record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Total folders in the enumerated list, reached or not.
    pub discovered: usize,
    /// Folders the routine was invoked for.
    pub attempted: usize,
    /// Folders whose invocation resolved successfully.
    pub succeeded: usize,
    /// Whether the run stopped at the deadline.
    pub truncated_by_deadline: bool,
    /// Per-folder records, in list order.
    pub outcomes: Vec<OperationOutcome>,
}

/// Drives one routine across an enumerated folder list.
///
/// Folders are processed strictly one at a time; the deadline is checked
/// between folders and cannot interrupt an operation already in flight.
#[derive(Debug, Default)]
pub struct BatchRunner {
    phase: BatchPhase,
}

impl BatchRunner {
    /// Creates an idle runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// The runner's current lifecycle phase.
    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    /// Runs `routine` over `resources` in list order.
    ///
    /// `deadline` is the absolute cutoff; when the current time has
    /// passed it, the run stops before the next folder and every
    /// remaining folder is left completely untouched. `None` runs
    /// unbudgeted. A failing folder never halts the run.
    pub async fn run(
        &mut self,
        resources: &[&Folder],
        routine: &dyn MaintenanceRoutine,
        deadline: Option<Instant>,
    ) -> BatchReport {
        self.phase = BatchPhase::Running;
        let mut report = BatchReport {
            discovered: resources.len(),
            attempted: 0,
            succeeded: 0,
            truncated_by_deadline: false,
            outcomes: Vec::new(),
        };

        for folder in resources {
            if deadline.is_some_and(|cutoff| Instant::now() > cutoff) {
                debug!(
                    remaining = report.discovered - report.outcomes.len(),
                    "deadline passed, truncating batch"
                );
                report.truncated_by_deadline = true;
                break;
            }
            if !routine.is_eligible(folder) {
                report.outcomes.push(OperationOutcome {
                    folder: folder.id.clone(),
                    attempted: false,
                    succeeded: false,
                });
                continue;
            }
            let succeeded =
                adapter::await_completion(|handle| routine.begin(folder, handle), routine.bound())
                    .await;
            report.attempted += 1;
            if succeeded {
                report.succeeded += 1;
            }
            report.outcomes.push(OperationOutcome {
                folder: folder.id.clone(),
                attempted: true,
                succeeded,
            });
        }

        self.phase = if report.truncated_by_deadline {
            BatchPhase::DeadlineExceeded
        } else {
            BatchPhase::Completed
        };
        report
    }
}
