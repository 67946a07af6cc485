//! Media reference entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use streamhub_core::types::{MediaId, OwnerId};

/// A content record whose stored URL and path embed `<login>/<folder>/`.
///
/// There is no foreign key to [`crate::folder::Folder`]; membership is
/// derived from the path components (see [`crate::media::FolderSegment`]).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MediaReference {
    /// Media identifier.
    pub id: MediaId,
    /// The owning tenant.
    pub owner_id: OwnerId,
    /// Display title.
    pub title: String,
    /// Public playback URL.
    pub url: String,
    /// Server-side file path.
    pub path: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a new media item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMedia {
    /// The owning tenant.
    pub owner_id: OwnerId,
    /// Display title.
    pub title: String,
    /// Public playback URL.
    pub url: String,
    /// Server-side file path.
    pub path: String,
    /// File size in bytes.
    pub size_bytes: i64,
}

/// New location fields for one media record after a folder rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPathUpdate {
    /// Media identifier.
    pub id: MediaId,
    /// Rewritten URL.
    pub url: String,
    /// Rewritten path.
    pub path: String,
}
