//! Result types returned by [`super::FolderService`].
//!
//! Primary (remote) failures are returned as errors. Catalog effects that
//! run after a committed remote change are reported here as
//! [`SecondaryOutcome`] values instead.

use serde::{Deserialize, Serialize};

use streamhub_core::AppError;
use streamhub_core::result::AppResult;
use streamhub_core::types::{FolderId, RemoteTargetId};
use streamhub_entity::usage::UsageReport;

/// Result of one best-effort catalog effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SecondaryOutcome {
    /// The effect ran and touched `rows` rows.
    Applied {
        /// Rows affected.
        rows: u64,
    },
    /// Nothing needed doing.
    Skipped,
    /// The effect failed; the primary change stands.
    Failed {
        /// Error text.
        error: String,
    },
}

impl SecondaryOutcome {
    /// Convert a row-count result.
    pub fn from_rows(result: AppResult<u64>) -> Self {
        match result {
            Ok(rows) => Self::Applied { rows },
            Err(e) => Self::failed(&e),
        }
    }

    /// Failed outcome carrying `err`'s text.
    pub fn failed(err: &AppError) -> Self {
        Self::Failed {
            error: err.to_string(),
        }
    }

    /// Whether the effect failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Rows touched, zero unless applied.
    pub fn rows(&self) -> u64 {
        match self {
            Self::Applied { rows } => *rows,
            _ => 0,
        }
    }
}

/// One entry of a folder listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderSummary {
    /// Catalog id; absent when the catalog could not register the folder.
    pub id: Option<FolderId>,
    /// Display name.
    pub display_name: String,
    /// Canonical name.
    pub name: String,
    /// Absolute remote path.
    pub path: String,
    /// Remote target.
    pub remote_target_id: RemoteTargetId,
    /// Entry type, always `"folder"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the entry is the default folder standing in for an empty
    /// or unreadable listing.
    pub synthesized: bool,
}

/// Result of listing an owner's folders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderListing {
    /// Folders, sorted by name.
    pub folders: Vec<FolderSummary>,
    /// Remote error when the listing is degraded.
    pub error: Option<String>,
}

/// Result of creating a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOutcome {
    /// Folder id.
    pub id: FolderId,
    /// Canonical name.
    pub name: String,
    /// Name as entered.
    pub original_name: String,
    /// Whether sanitization changed more than letter case.
    pub sanitized: bool,
    /// Absolute remote path.
    pub path: String,
    /// Remote target.
    pub remote_target_id: RemoteTargetId,
    /// Catalog registration.
    pub catalog: SecondaryOutcome,
}

/// What rename did to the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameAction {
    /// The directory was moved.
    Moved,
    /// The old directory was missing; a new one was created.
    Recreated,
    /// The canonical name did not change.
    Unchanged,
}

/// Result of renaming a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameOutcome {
    /// Folder id, unchanged by the rename.
    pub id: FolderId,
    /// Previous canonical name.
    pub old_name: String,
    /// New canonical name.
    pub new_name: String,
    /// New display name.
    pub display_name: String,
    /// Whether sanitization changed more than letter case.
    pub sanitized: bool,
    /// New absolute remote path.
    pub path: String,
    /// Remote action taken.
    pub remote_action: RenameAction,
    /// Catalog row update.
    pub catalog: SecondaryOutcome,
    /// Media path rewrite.
    pub media: SecondaryOutcome,
}

/// Result of deleting a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Folder id.
    pub id: FolderId,
    /// Absolute remote path.
    pub path: String,
    /// Whether a remote directory was removed (false when already absent).
    pub remote_removed: bool,
    /// Purge of referencing media rows.
    pub media: SecondaryOutcome,
    /// Marking the catalog row removed.
    pub catalog: SecondaryOutcome,
}

/// Catalog-side usage figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogUsage {
    /// Referencing media records.
    pub media_count: u64,
    /// Sum of their sizes in bytes.
    pub total_bytes: u64,
    /// Error marker when the catalog could not be read.
    pub error: Option<String>,
}

/// Remote-side usage figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteUsage {
    /// Whether the directory exists.
    pub exists: bool,
    /// Regular files under the directory.
    pub file_count: u64,
    /// Disk usage in bytes.
    pub size_bytes: u64,
    /// Error marker when the remote store could not be read.
    pub error: Option<String>,
}

/// Result of inspecting a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderInfo {
    /// Folder id.
    pub id: FolderId,
    /// Canonical name.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// Absolute remote path.
    pub path: String,
    /// Catalog figures.
    pub catalog: CatalogUsage,
    /// Remote figures.
    pub remote: RemoteUsage,
    /// Reconciled usage.
    pub usage: UsageReport,
}

/// Result of synchronizing a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Folder id.
    pub id: FolderId,
    /// Absolute remote path.
    pub path: String,
    /// Transient files removed.
    pub transient_removed: u64,
    /// Usage estimate refresh.
    pub catalog: SecondaryOutcome,
}
