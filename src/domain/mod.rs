//! Domain layer types for the mailtend maintenance engine.
//!
//! This module contains the core value types used throughout the crate:
//! account and folder snapshots, identifier newtypes, and history events.

mod account;
mod folder;
mod history;
mod types;

pub use account::Account;
pub use folder::Folder;
pub use history::{EventKind, HistoryEvent};
pub use types::{AccountId, FolderId};
