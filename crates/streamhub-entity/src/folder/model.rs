//! Folder entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use streamhub_core::AppError;
use streamhub_core::types::{FolderId, OwnerId, RemoteTargetId};

use super::name::FolderName;

/// Lifecycle state of a catalog folder row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "folder_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FolderStatus {
    /// The folder is live.
    Active,
    /// The remote directory was deleted.
    Removed,
}

impl FolderStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for FolderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FolderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "removed" => Ok(Self::Removed),
            _ => Err(AppError::validation(format!(
                "Invalid folder status: '{s}'. Expected one of: active, removed"
            ))),
        }
    }
}

/// A logical folder: one directory under an owner's root on a remote target.
///
/// Catalog rows are bookkeeping. The remote directory is authoritative,
/// so `space_used_mb` is only an estimate refreshed by sync.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Immutable folder identifier.
    pub id: FolderId,
    /// The owning tenant.
    pub owner_id: OwnerId,
    /// The remote target storing the directory.
    pub remote_target_id: RemoteTargetId,
    /// Name as last entered by the owner.
    pub display_name: String,
    /// Canonical name; also the remote directory name.
    pub name: String,
    /// Absolute remote directory path.
    pub remote_path: String,
    /// Last known usage estimate in megabytes.
    pub space_used_mb: i64,
    /// Lifecycle state.
    pub status: FolderStatus,
    /// When the folder was first registered.
    pub created_at: DateTime<Utc>,
    /// When the row last changed.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Whether the folder is live.
    pub fn is_active(&self) -> bool {
        self.status == FolderStatus::Active
    }

    /// The canonical name, if the stored value is canonical.
    pub fn folder_name(&self) -> Option<FolderName> {
        FolderName::parse(&self.name)
    }
}

/// Data required to register a folder in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFolder {
    /// Identifier to assign when no row exists yet.
    pub id: FolderId,
    /// The owning tenant.
    pub owner_id: OwnerId,
    /// The remote target.
    pub remote_target_id: RemoteTargetId,
    /// Name as entered.
    pub display_name: String,
    /// Canonical name.
    pub name: FolderName,
    /// Absolute remote directory path.
    pub remote_path: String,
}
