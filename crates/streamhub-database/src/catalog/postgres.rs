//! PostgreSQL-backed folder catalog.

use async_trait::async_trait;

use streamhub_core::result::AppResult;
use streamhub_core::types::{FolderId, OwnerId, RemoteTargetId};
use streamhub_entity::folder::{Folder, FolderName, FolderStatus, NewFolder};
use streamhub_entity::media::{FolderSegment, MediaReference, NewMedia};
use streamhub_entity::owner::OwnerSettings;

use super::FolderCatalog;
use crate::connection::DatabasePool;
use crate::repositories::{FolderRepository, MediaRepository, OwnerSettingsRepository};

/// Folder catalog stored in PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgFolderCatalog {
    db: DatabasePool,
    folders: FolderRepository,
    media: MediaRepository,
    owners: OwnerSettingsRepository,
}

impl PgFolderCatalog {
    /// Build the catalog over an open pool.
    pub fn new(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            folders: FolderRepository::new(pool.clone()),
            media: MediaRepository::new(pool.clone()),
            owners: OwnerSettingsRepository::new(pool),
            db,
        }
    }
}

#[async_trait]
impl FolderCatalog for PgFolderCatalog {
    fn provider_name(&self) -> &str {
        "postgres"
    }

    async fn find_owner_settings(&self, owner_id: OwnerId) -> AppResult<Option<OwnerSettings>> {
        self.owners.find(owner_id).await
    }

    async fn save_owner_settings(&self, settings: &OwnerSettings) -> AppResult<OwnerSettings> {
        self.owners.upsert(settings).await
    }

    async fn list_for_owner(&self, owner_id: OwnerId) -> AppResult<Vec<Folder>> {
        self.folders.find_by_owner(owner_id).await
    }

    async fn find_folder(&self, owner_id: OwnerId, id: FolderId) -> AppResult<Option<Folder>> {
        self.folders.find_by_id(owner_id, id).await
    }

    async fn find_folder_by_name(
        &self,
        owner_id: OwnerId,
        target: RemoteTargetId,
        name: &FolderName,
    ) -> AppResult<Option<Folder>> {
        self.folders.find_by_name(owner_id, target, name).await
    }

    async fn register_folder(&self, data: &NewFolder) -> AppResult<Folder> {
        self.folders.upsert(data).await
    }

    async fn rename_folder(
        &self,
        id: FolderId,
        name: &FolderName,
        display_name: &str,
        remote_path: &str,
    ) -> AppResult<Folder> {
        self.folders
            .rename(id, name, display_name, remote_path)
            .await
    }

    async fn mark_removed(&self, id: FolderId) -> AppResult<()> {
        self.folders.set_status(id, FolderStatus::Removed).await
    }

    async fn update_usage(&self, id: FolderId, space_used_mb: i64) -> AppResult<()> {
        self.folders.update_usage(id, space_used_mb).await
    }

    async fn insert_media(&self, data: &NewMedia) -> AppResult<MediaReference> {
        self.media.create(data).await
    }

    async fn list_media(&self, owner_id: OwnerId) -> AppResult<Vec<MediaReference>> {
        self.media.find_by_owner(owner_id).await
    }

    async fn count_referencing_media(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<u64> {
        let rows = self.media.find_in_folder(owner_id, segment).await?;
        Ok(rows.len() as u64)
    }

    async fn sum_media_bytes(&self, owner_id: OwnerId, segment: &FolderSegment) -> AppResult<u64> {
        let rows = self.media.find_in_folder(owner_id, segment).await?;
        Ok(rows.iter().map(|m| m.size_bytes.max(0) as u64).sum())
    }

    async fn rewrite_media_paths(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
        new_folder: &FolderName,
    ) -> AppResult<u64> {
        self.media.rewrite_folder(owner_id, segment, new_folder).await
    }

    async fn delete_referencing_media(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<u64> {
        self.media.delete_in_folder(owner_id, segment).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}
