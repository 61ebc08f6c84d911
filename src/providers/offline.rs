//! Host-info provider for runs without a live host session.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::services::{AddonInfo, ApplicationInfo, HostInfo, PlatformInfo};

/// A [`HostInfo`] for standalone runs: every read fails, so report
/// headers fall back to their `unknown` fields and empty lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineHost;

#[async_trait]
impl HostInfo for OfflineHost {
    async fn application(&self) -> Result<ApplicationInfo> {
        Err(anyhow!("no host session"))
    }

    async fn platform(&self) -> Result<PlatformInfo> {
        Err(anyhow!("no host session"))
    }

    async fn addons(&self) -> Result<Vec<AddonInfo>> {
        Err(anyhow!("no host session"))
    }
}
