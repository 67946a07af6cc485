//! In-memory folder catalog.
//!
//! Used for local development (`catalog.provider = "memory"`) and as the
//! catalog of the service and integration tests. Applies the same
//! uniqueness and path-component rules as the Postgres backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::debug;

use streamhub_core::AppError;
use streamhub_core::result::AppResult;
use streamhub_core::types::{FolderId, MediaId, OwnerId, RemoteTargetId};
use streamhub_entity::folder::{Folder, FolderName, FolderStatus, NewFolder};
use streamhub_entity::media::{FolderSegment, MediaReference, NewMedia};
use streamhub_entity::owner::OwnerSettings;

use super::FolderCatalog;

/// Folder catalog held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFolderCatalog {
    folders: Arc<RwLock<HashMap<FolderId, Folder>>>,
    media: Arc<RwLock<HashMap<MediaId, MediaReference>>>,
    owners: Arc<DashMap<OwnerId, OwnerSettings>>,
}

impl MemoryFolderCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_slot(folder: &Folder, owner_id: OwnerId, target: RemoteTargetId, name: &str) -> bool {
    folder.owner_id == owner_id && folder.remote_target_id == target && folder.name == name
}

#[async_trait]
impl FolderCatalog for MemoryFolderCatalog {
    fn provider_name(&self) -> &str {
        "memory"
    }

    async fn find_owner_settings(&self, owner_id: OwnerId) -> AppResult<Option<OwnerSettings>> {
        Ok(self.owners.get(&owner_id).map(|s| s.value().clone()))
    }

    async fn save_owner_settings(&self, settings: &OwnerSettings) -> AppResult<OwnerSettings> {
        self.owners.insert(settings.owner_id, settings.clone());
        Ok(settings.clone())
    }

    async fn list_for_owner(&self, owner_id: OwnerId) -> AppResult<Vec<Folder>> {
        let folders = self.folders.read().await;
        let mut out: Vec<Folder> = folders
            .values()
            .filter(|f| f.owner_id == owner_id && f.is_active())
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn find_folder(&self, owner_id: OwnerId, id: FolderId) -> AppResult<Option<Folder>> {
        let folders = self.folders.read().await;
        Ok(folders.get(&id).filter(|f| f.owner_id == owner_id).cloned())
    }

    async fn find_folder_by_name(
        &self,
        owner_id: OwnerId,
        target: RemoteTargetId,
        name: &FolderName,
    ) -> AppResult<Option<Folder>> {
        let folders = self.folders.read().await;
        Ok(folders
            .values()
            .find(|f| same_slot(f, owner_id, target, name.as_str()))
            .cloned())
    }

    async fn register_folder(&self, data: &NewFolder) -> AppResult<Folder> {
        let mut folders = self.folders.write().await;
        let now = Utc::now();

        if let Some(existing) = folders
            .values_mut()
            .find(|f| same_slot(f, data.owner_id, data.remote_target_id, data.name.as_str()))
        {
            if existing.status == FolderStatus::Removed {
                existing.display_name = data.display_name.clone();
            }
            existing.status = FolderStatus::Active;
            existing.remote_path = data.remote_path.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let folder = Folder {
            id: data.id,
            owner_id: data.owner_id,
            remote_target_id: data.remote_target_id,
            display_name: data.display_name.clone(),
            name: data.name.as_str().to_string(),
            remote_path: data.remote_path.clone(),
            space_used_mb: 0,
            status: FolderStatus::Active,
            created_at: now,
            updated_at: now,
        };
        folders.insert(folder.id, folder.clone());
        debug!(folder_id = %folder.id, name = %folder.name, "Registered folder in memory catalog");
        Ok(folder)
    }

    async fn rename_folder(
        &self,
        id: FolderId,
        name: &FolderName,
        display_name: &str,
        remote_path: &str,
    ) -> AppResult<Folder> {
        let mut folders = self.folders.write().await;
        let current = folders
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        let holder = folders
            .values()
            .find(|f| {
                f.id != id && same_slot(f, current.owner_id, current.remote_target_id, name.as_str())
            })
            .map(|f| (f.id, f.status));
        match holder {
            Some((_, FolderStatus::Active)) => {
                return Err(AppError::database(format!(
                    "Folder name '{name}' is already registered"
                )));
            }
            Some((removed_id, FolderStatus::Removed)) => {
                folders.remove(&removed_id);
            }
            None => {}
        }

        let folder = folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        folder.name = name.as_str().to_string();
        folder.display_name = display_name.to_string();
        folder.remote_path = remote_path.to_string();
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    async fn mark_removed(&self, id: FolderId) -> AppResult<()> {
        if let Some(folder) = self.folders.write().await.get_mut(&id) {
            folder.status = FolderStatus::Removed;
            folder.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_usage(&self, id: FolderId, space_used_mb: i64) -> AppResult<()> {
        if let Some(folder) = self.folders.write().await.get_mut(&id) {
            folder.space_used_mb = space_used_mb;
            folder.status = FolderStatus::Active;
            folder.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn insert_media(&self, data: &NewMedia) -> AppResult<MediaReference> {
        let media = MediaReference {
            id: MediaId::new(),
            owner_id: data.owner_id,
            title: data.title.clone(),
            url: data.url.clone(),
            path: data.path.clone(),
            size_bytes: data.size_bytes,
            created_at: Utc::now(),
        };
        self.media.write().await.insert(media.id, media.clone());
        Ok(media)
    }

    async fn list_media(&self, owner_id: OwnerId) -> AppResult<Vec<MediaReference>> {
        let media = self.media.read().await;
        let mut out: Vec<MediaReference> = media
            .values()
            .filter(|m| m.owner_id == owner_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn count_referencing_media(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<u64> {
        let media = self.media.read().await;
        Ok(media
            .values()
            .filter(|m| m.owner_id == owner_id && segment.references(m))
            .count() as u64)
    }

    async fn sum_media_bytes(&self, owner_id: OwnerId, segment: &FolderSegment) -> AppResult<u64> {
        let media = self.media.read().await;
        Ok(media
            .values()
            .filter(|m| m.owner_id == owner_id && segment.references(m))
            .map(|m| m.size_bytes.max(0) as u64)
            .sum())
    }

    async fn rewrite_media_paths(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
        new_folder: &FolderName,
    ) -> AppResult<u64> {
        let mut media = self.media.write().await;
        let mut rows = 0u64;
        for m in media.values_mut().filter(|m| m.owner_id == owner_id) {
            if let Some(update) = segment.rewrite_reference(m, new_folder.as_str()) {
                m.url = update.url;
                m.path = update.path;
                rows += 1;
            }
        }
        Ok(rows)
    }

    async fn delete_referencing_media(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<u64> {
        let mut media = self.media.write().await;
        let before = media.len();
        media.retain(|_, m| !(m.owner_id == owner_id && segment.references(m)));
        Ok((before - media.len()) as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
