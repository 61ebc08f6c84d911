//! Folder domain types.
//!
//! A [`Folder`] is a point-in-time snapshot of one folder in a mail
//! store's hierarchy, and the unit of maintenance work.

use serde::{Deserialize, Serialize};

use super::FolderId;

/// A snapshot of one folder in an account's hierarchy.
///
/// Snapshots are value types detached from the live host tree: they own
/// their children, and later mutation of the underlying store does not
/// retroactively change an in-progress maintenance run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Unique identifier for this folder.
    pub id: FolderId,
    /// Slash-separated path from the account root, e.g. `/INBOX/Receipts`.
    pub path: String,
    /// Display name shown in reports.
    pub name: String,
    /// Whether the store supports compacting this folder.
    pub can_compact: bool,
    /// Whether this is a virtual (saved-search) folder. Virtual folders
    /// have no backing index of their own and are excluded from repair.
    pub is_virtual: bool,
    /// Total message count, when the store reports one.
    pub total_messages: Option<u32>,
    /// Unread message count, when the store reports one.
    pub unread_messages: Option<u32>,
    /// Child folders, in the order the store lists them.
    pub children: Vec<Folder>,
}

impl Folder {
    /// Creates a plain compactable folder with no children and unknown
    /// message counters. The identifier is derived from the path.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: FolderId(path.clone()),
            path,
            name: name.into(),
            can_compact: true,
            is_virtual: false,
            total_messages: None,
            unread_messages: None,
            children: Vec::new(),
        }
    }

    /// Replaces the child list, preserving the given order.
    pub fn with_children(mut self, children: Vec<Folder>) -> Self {
        self.children = children;
        self
    }

    /// Sets both message counters.
    pub fn with_counts(mut self, total: u32, unread: u32) -> Self {
        self.total_messages = Some(total);
        self.unread_messages = Some(unread);
        self
    }
}
