//! Catalog manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use streamhub_core::AppError;
use streamhub_core::config::{CatalogConfig, DatabaseConfig};
use streamhub_core::result::AppResult;
use streamhub_core::types::{FolderId, OwnerId, RemoteTargetId};
use streamhub_entity::folder::{Folder, FolderName, NewFolder};
use streamhub_entity::media::{FolderSegment, MediaReference, NewMedia};
use streamhub_entity::owner::OwnerSettings;

use super::{FolderCatalog, PgFolderCatalog};
use crate::connection::DatabasePool;

/// Folder catalog wrapping the backend selected by configuration.
#[derive(Debug, Clone)]
pub struct CatalogManager {
    inner: Arc<dyn FolderCatalog>,
}

impl CatalogManager {
    /// Build the catalog named by `config.provider`.
    ///
    /// Only `postgres` is selectable here. The memory backend forgets
    /// everything when the process exits, so it is wired in through
    /// [`CatalogManager::from_catalog`] instead.
    pub async fn new(config: &CatalogConfig, database: &DatabaseConfig) -> AppResult<Self> {
        let inner: Arc<dyn FolderCatalog> = match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL folder catalog");
                let pool = DatabasePool::connect(database).await?;
                Arc::new(PgFolderCatalog::new(pool))
            }
            "memory" => {
                return Err(AppError::configuration(
                    "The memory catalog does not persist between runs; configure provider = \"postgres\"",
                ));
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown catalog provider: '{other}'. Supported: postgres"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Wrap an existing backend, such as the in-memory catalog.
    pub fn from_catalog(catalog: Arc<dyn FolderCatalog>) -> Self {
        Self { inner: catalog }
    }

    /// Shared handle to the backend.
    pub fn catalog(&self) -> Arc<dyn FolderCatalog> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl FolderCatalog for CatalogManager {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    async fn find_owner_settings(&self, owner_id: OwnerId) -> AppResult<Option<OwnerSettings>> {
        self.inner.find_owner_settings(owner_id).await
    }

    async fn save_owner_settings(&self, settings: &OwnerSettings) -> AppResult<OwnerSettings> {
        self.inner.save_owner_settings(settings).await
    }

    async fn list_for_owner(&self, owner_id: OwnerId) -> AppResult<Vec<Folder>> {
        self.inner.list_for_owner(owner_id).await
    }

    async fn find_folder(&self, owner_id: OwnerId, id: FolderId) -> AppResult<Option<Folder>> {
        self.inner.find_folder(owner_id, id).await
    }

    async fn find_folder_by_name(
        &self,
        owner_id: OwnerId,
        target: RemoteTargetId,
        name: &FolderName,
    ) -> AppResult<Option<Folder>> {
        self.inner.find_folder_by_name(owner_id, target, name).await
    }

    async fn register_folder(&self, data: &NewFolder) -> AppResult<Folder> {
        self.inner.register_folder(data).await
    }

    async fn rename_folder(
        &self,
        id: FolderId,
        name: &FolderName,
        display_name: &str,
        remote_path: &str,
    ) -> AppResult<Folder> {
        self.inner
            .rename_folder(id, name, display_name, remote_path)
            .await
    }

    async fn mark_removed(&self, id: FolderId) -> AppResult<()> {
        self.inner.mark_removed(id).await
    }

    async fn update_usage(&self, id: FolderId, space_used_mb: i64) -> AppResult<()> {
        self.inner.update_usage(id, space_used_mb).await
    }

    async fn insert_media(&self, data: &NewMedia) -> AppResult<MediaReference> {
        self.inner.insert_media(data).await
    }

    async fn list_media(&self, owner_id: OwnerId) -> AppResult<Vec<MediaReference>> {
        self.inner.list_media(owner_id).await
    }

    async fn count_referencing_media(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<u64> {
        self.inner.count_referencing_media(owner_id, segment).await
    }

    async fn sum_media_bytes(&self, owner_id: OwnerId, segment: &FolderSegment) -> AppResult<u64> {
        self.inner.sum_media_bytes(owner_id, segment).await
    }

    async fn rewrite_media_paths(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
        new_folder: &FolderName,
    ) -> AppResult<u64> {
        self.inner
            .rewrite_media_paths(owner_id, segment, new_folder)
            .await
    }

    async fn delete_referencing_media(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<u64> {
        self.inner.delete_referencing_media(owner_id, segment).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
