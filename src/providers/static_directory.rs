//! In-memory account directory.

use async_trait::async_trait;

use anyhow::Result;

use crate::domain::Account;
use crate::services::AccountDirectory;

/// An [`AccountDirectory`] serving a fixed snapshot.
///
/// Used by the standalone binary and by tests, where deterministic
/// enumeration without a live host is the point.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    accounts: Vec<Account>,
}

impl StaticDirectory {
    /// Creates a directory serving the given accounts in order.
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    /// Creates a directory with no accounts.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountDirectory for StaticDirectory {
    async fn accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.clone())
    }
}
