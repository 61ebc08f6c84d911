//! Maintenance orchestration services.
//!
//! This module contains the core of the engine, coordinating between the
//! host providers, domain snapshots, and the run history:
//!
//! ```text
//! Command transport (external)
//!          |
//!          v
//!    Services layer  <-- You are here
//!          |
//!          v
//! Host providers (directory, maintenance bridge, host info)
//! ```
//!
//! # Services Overview
//!
//! - [`enumerator`]: flattens the account/folder forest breadth-first
//! - [`await_completion`]: bridges callback-signalled primitives into
//!   awaited outcomes
//! - [`BatchRunner`]: drives a routine across the folder list under a
//!   wall-clock deadline
//! - [`RunHistory`]: the process-lifetime command-outcome log
//! - [`MaintenanceService`]: the command handlers
//! - [`DiagnosticsReporter`]: the line-oriented report compiler

mod adapter;
mod batch;
mod diagnostics;
pub mod enumerator;
mod history;
mod maintenance;

pub use adapter::{await_completion, CompletionHandle, Dispatch};
pub use batch::{BatchPhase, BatchReport, BatchRunner, MaintenanceRoutine, OperationOutcome};
pub use diagnostics::{
    AddonInfo, ApplicationInfo, DiagnosticsReporter, HostInfo, PlatformInfo, ProductInfo,
};
pub use history::{RunHistory, RECENT_WINDOW};
pub use maintenance::{AccountDirectory, MaintenanceHost, MaintenanceService};
