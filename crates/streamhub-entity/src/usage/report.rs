//! Folder usage report value object.

use serde::{Deserialize, Serialize};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Round a byte count up to whole megabytes.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes.div_ceil(BYTES_PER_MB)
}

/// Space used by a folder as seen by the catalog and by the remote store.
///
/// The two figures disagree by nature: the catalog only knows indexed
/// media while the remote store sees every file. `reported_mb` is the
/// larger of the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Megabytes according to catalog media sizes.
    pub catalog_mb: u64,
    /// Megabytes according to remote disk usage.
    pub remote_mb: u64,
    /// `max(catalog_mb, remote_mb)`.
    pub reported_mb: u64,
    /// Quota the percentage is computed against.
    pub quota_mb: u64,
    /// Rounded percentage of the quota in use.
    pub percent_of_quota: u64,
}

impl UsageReport {
    /// Build a report from byte totals. Missing sources count as zero.
    pub fn new(catalog_bytes: Option<u64>, remote_bytes: Option<u64>, quota_mb: u64) -> Self {
        let catalog_mb = bytes_to_mb(catalog_bytes.unwrap_or(0));
        let remote_mb = bytes_to_mb(remote_bytes.unwrap_or(0));
        let reported_mb = catalog_mb.max(remote_mb);
        let percent_of_quota = if quota_mb == 0 {
            0
        } else {
            (reported_mb * 100 + quota_mb / 2) / quota_mb
        };

        Self {
            catalog_mb,
            remote_mb,
            reported_mb,
            quota_mb,
            percent_of_quota,
        }
    }

    /// Whether the reported usage is at or above the quota.
    pub fn is_exceeded(&self) -> bool {
        self.quota_mb > 0 && self.reported_mb >= self.quota_mb
    }
}
