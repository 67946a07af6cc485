//! Usage quota configuration.

use serde::{Deserialize, Serialize};

/// Quota applied when an owner has no explicit quota in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Default per-owner quota in megabytes.
    #[serde(default = "default_quota_mb")]
    pub default_quota_mb: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_quota_mb: default_quota_mb(),
        }
    }
}

fn default_quota_mb() -> u64 {
    1000
}
