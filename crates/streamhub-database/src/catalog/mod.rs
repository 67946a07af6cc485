//! The folder catalog: relational bookkeeping for folders and the media
//! records that point into them.
//!
//! The catalog is secondary to the remote store. Services treat most of
//! its writes as best-effort and report their outcome separately.

pub mod memory;
pub mod postgres;
pub mod provider;

use async_trait::async_trait;

use streamhub_core::result::AppResult;
use streamhub_core::types::{FolderId, OwnerId, RemoteTargetId};
use streamhub_entity::folder::{Folder, FolderName, NewFolder};
use streamhub_entity::media::{FolderSegment, MediaReference, NewMedia};
use streamhub_entity::owner::OwnerSettings;

pub use memory::MemoryFolderCatalog;
pub use postgres::PgFolderCatalog;
pub use provider::CatalogManager;

/// Registry of folder metadata and media cross-references.
///
/// Every media operation takes a [`FolderSegment`] and must apply its
/// path-component rule exactly; rows of other owners are never read or
/// written.
#[async_trait]
pub trait FolderCatalog: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider name (e.g., "postgres", "memory").
    fn provider_name(&self) -> &str;

    /// Settings row of an owner, if one exists.
    async fn find_owner_settings(&self, owner_id: OwnerId) -> AppResult<Option<OwnerSettings>>;

    /// Insert or replace an owner's settings.
    async fn save_owner_settings(&self, settings: &OwnerSettings) -> AppResult<OwnerSettings>;

    /// Active folders of an owner, ordered by name.
    async fn list_for_owner(&self, owner_id: OwnerId) -> AppResult<Vec<Folder>>;

    /// Folder by id, scoped to its owner. Includes removed folders.
    async fn find_folder(&self, owner_id: OwnerId, id: FolderId) -> AppResult<Option<Folder>>;

    /// Folder by canonical name on a target. Includes removed folders.
    async fn find_folder_by_name(
        &self,
        owner_id: OwnerId,
        target: RemoteTargetId,
        name: &FolderName,
    ) -> AppResult<Option<Folder>>;

    /// Register a folder. An existing row with the same (owner, name,
    /// target) is reactivated and returned with its original id.
    async fn register_folder(&self, data: &NewFolder) -> AppResult<Folder>;

    /// Change name, display name and remote path of a folder.
    async fn rename_folder(
        &self,
        id: FolderId,
        name: &FolderName,
        display_name: &str,
        remote_path: &str,
    ) -> AppResult<Folder>;

    /// Mark a folder removed.
    async fn mark_removed(&self, id: FolderId) -> AppResult<()>;

    /// Store a usage estimate and mark the folder active.
    async fn update_usage(&self, id: FolderId, space_used_mb: i64) -> AppResult<()>;

    /// Record a media item.
    async fn insert_media(&self, data: &NewMedia) -> AppResult<MediaReference>;

    /// All media of an owner.
    async fn list_media(&self, owner_id: OwnerId) -> AppResult<Vec<MediaReference>>;

    /// Number of the owner's media records inside `segment`.
    async fn count_referencing_media(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<u64>;

    /// Total size in bytes of the owner's media records inside `segment`.
    async fn sum_media_bytes(&self, owner_id: OwnerId, segment: &FolderSegment) -> AppResult<u64>;

    /// Move the owner's media records from `segment` to `new_folder`.
    /// Returns the number of rows changed.
    async fn rewrite_media_paths(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
        new_folder: &FolderName,
    ) -> AppResult<u64>;

    /// Delete the owner's media records inside `segment`. Returns rows deleted.
    async fn delete_referencing_media(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
