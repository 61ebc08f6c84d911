//! Account domain types.
//!
//! Represents a mail account snapshot taken from the account directory
//! at enumeration time.

use serde::{Deserialize, Serialize};

use super::{AccountId, Folder};

/// A mail account configured in the host application.
///
/// Read-only snapshot: created at the start of each command that needs
/// the tree and discarded when the command completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for this account.
    pub id: AccountId,
    /// Display name shown in reports.
    pub name: String,
    /// Root of this account's folder tree. Accounts without a provisioned
    /// store have no root and are skipped during enumeration.
    pub root: Option<Folder>,
}

impl Account {
    /// Creates an account snapshot with the given root folder.
    pub fn new(id: impl Into<AccountId>, name: impl Into<String>, root: Folder) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            root: Some(root),
        }
    }

    /// Creates an account snapshot with no provisioned store.
    pub fn without_root(id: impl Into<AccountId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            root: None,
        }
    }
}
