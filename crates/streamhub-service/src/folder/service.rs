//! Folder reconciliation across the remote store and the catalog.
//!
//! The remote directory is authoritative. Each operation verifies remote
//! and catalog state, performs the remote mutation, and only then applies
//! catalog effects, which are reported rather than allowed to fail the
//! operation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use streamhub_core::AppError;
use streamhub_core::config::QuotaConfig;
use streamhub_core::error::ConflictDetail;
use streamhub_core::result::AppResult;
use streamhub_core::types::FolderId;
use streamhub_database::FolderCatalog;
use streamhub_entity::folder::{Folder, FolderName, NewFolder, Sanitized};
use streamhub_entity::owner::OwnerContext;
use streamhub_entity::usage::bytes_to_mb;
use streamhub_remote::{RemoteFolderGateway, TargetRegistry};

use super::locks::{FolderLocks, LockKey};
use super::outcome::{
    CreateOutcome, DeleteOutcome, FolderInfo, FolderListing, FolderSummary, RenameAction,
    RenameOutcome, SecondaryOutcome, SyncOutcome,
};
use super::rewriter::PathRewriter;
use super::usage::UsageAccountant;
use crate::context::OwnerScope;

/// Coordinates folder operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    catalog: Arc<dyn FolderCatalog>,
    gateway: RemoteFolderGateway,
    targets: TargetRegistry,
    rewriter: PathRewriter,
    accountant: UsageAccountant,
    locks: FolderLocks,
    default_quota_mb: u64,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        catalog: Arc<dyn FolderCatalog>,
        gateway: RemoteFolderGateway,
        targets: TargetRegistry,
        quota: &QuotaConfig,
    ) -> Self {
        Self {
            rewriter: PathRewriter::new(Arc::clone(&catalog)),
            accountant: UsageAccountant::new(Arc::clone(&catalog), gateway.clone()),
            catalog,
            gateway,
            targets,
            locks: FolderLocks::new(),
            default_quota_mb: quota.default_quota_mb,
        }
    }

    /// Resolve login, remote target and quota for `owner`.
    ///
    /// An assigned target that is not configured is a configuration error.
    pub async fn resolve_scope(&self, owner: &OwnerContext) -> AppResult<OwnerScope> {
        let login = owner.login()?;
        let settings = self.catalog.find_owner_settings(owner.owner_id).await?;

        let assigned = settings.as_ref().and_then(|s| s.remote_target_id);
        let target = self.targets.resolve(assigned)?.clone();
        let quota_mb = settings
            .and_then(|s| s.quota_mb)
            .map(|q| q.max(0) as u64)
            .unwrap_or(self.default_quota_mb);

        Ok(OwnerScope {
            owner: owner.clone(),
            login,
            target,
            quota_mb,
        })
    }

    /// Lists the owner's folders from the remote store.
    ///
    /// Remote directories without a catalog row are registered on the fly,
    /// each under its name lock and only if the directory is still there.
    /// An empty or unreadable listing yields the synthesized default folder.
    pub async fn list_folders(&self, owner: &OwnerContext) -> AppResult<FolderListing> {
        let scope = self.resolve_scope(owner).await?;

        let names = match self.gateway.list_folders(&scope.target, &scope.login).await {
            Ok(names) => names,
            Err(e) => {
                warn!(
                    owner_id = %owner.owner_id,
                    target_id = %scope.target.id,
                    error = %e,
                    "Remote listing failed; returning default folder only"
                );
                let default = self.synthesized_default(&scope).await;
                return Ok(FolderListing {
                    folders: vec![default],
                    error: Some(e.to_string()),
                });
            }
        };

        let mut folders = Vec::with_capacity(names.len());
        for raw in names {
            let Some(name) = FolderName::parse(&raw) else {
                warn!(
                    owner_id = %owner.owner_id,
                    directory = %raw,
                    "Skipping remote directory with a non-canonical name"
                );
                continue;
            };
            if let Some(summary) = self.adopt_listed(&scope, &name, &raw).await {
                folders.push(summary);
            }
        }

        if folders.is_empty() {
            folders.push(self.synthesized_default(&scope).await);
        }

        Ok(FolderListing {
            folders,
            error: None,
        })
    }

    /// Creates a folder under the owner's root on the owner's target.
    pub async fn create_folder(
        &self,
        owner: &OwnerContext,
        raw_name: &str,
    ) -> AppResult<CreateOutcome> {
        let Sanitized { name, changed } = self.sanitize_input(raw_name)?;
        let scope = self.resolve_scope(owner).await?;
        let _guard = self
            .locks
            .acquire([LockKey::Name(owner.owner_id, name.to_string())])
            .await;

        let path = scope.folder_path(&name);
        self.gateway
            .ensure_user_structure(&scope.target, &scope.login)
            .await?;
        self.gateway.create_folder(&scope.target, &path).await?;

        info!(
            owner_id = %owner.owner_id,
            folder = %name,
            target_id = %scope.target.id,
            sanitized = changed,
            "Folder created"
        );

        let mut id = FolderId::new();
        let catalog = match self
            .catalog
            .register_folder(&NewFolder {
                id,
                owner_id: owner.owner_id,
                remote_target_id: scope.target.id,
                display_name: raw_name.trim().to_string(),
                name: name.clone(),
                remote_path: path.clone(),
            })
            .await
        {
            Ok(folder) => {
                id = folder.id;
                SecondaryOutcome::Applied { rows: 1 }
            }
            Err(e) => {
                warn!(
                    owner_id = %owner.owner_id,
                    folder = %name,
                    error = %e,
                    "Folder exists remotely but could not be registered"
                );
                SecondaryOutcome::failed(&e)
            }
        };

        Ok(CreateOutcome {
            id,
            name: name.into_inner(),
            original_name: raw_name.to_string(),
            sanitized: changed,
            path,
            remote_target_id: scope.target.id,
            catalog,
        })
    }

    /// Renames a folder, moving its remote directory and rewriting the
    /// media records that point into it.
    pub async fn rename_folder(
        &self,
        owner: &OwnerContext,
        id: FolderId,
        raw_name: &str,
    ) -> AppResult<RenameOutcome> {
        let Sanitized { name: new_name, changed } = self.sanitize_input(raw_name)?;
        let display_name = raw_name.trim().to_string();
        let scope = self.resolve_scope(owner).await?;

        let _folder_guard = self.locks.acquire([LockKey::Folder(id)]).await;
        let (folder, old_name, scope) = self.load_active(&scope, id).await?;
        let _name_guard = self
            .locks
            .acquire([
                LockKey::Name(owner.owner_id, old_name.to_string()),
                LockKey::Name(owner.owner_id, new_name.to_string()),
            ])
            .await;

        let old_path = scope.folder_path(&old_name);
        let new_path = scope.folder_path(&new_name);

        if new_name == old_name {
            let catalog = self
                .update_catalog_name(&folder, &new_name, &display_name, &new_path)
                .await;
            return Ok(RenameOutcome {
                id,
                old_name: old_name.into_inner(),
                new_name: new_name.into_inner(),
                display_name,
                sanitized: changed,
                path: new_path,
                remote_action: RenameAction::Unchanged,
                catalog,
                media: SecondaryOutcome::Skipped,
            });
        }

        if let Some(other) = self
            .catalog
            .find_folder_by_name(owner.owner_id, scope.target.id, &new_name)
            .await?
            .filter(|f| f.id != id && f.is_active())
        {
            return Err(AppError::conflict(
                format!("Folder '{}' already exists", other.name),
                ConflictDetail::NameTaken,
            ));
        }
        if self.gateway.exists(&scope.target, &new_path).await? {
            return Err(AppError::conflict(
                format!("Remote directory '{new_name}' already exists"),
                ConflictDetail::NameTaken,
            ));
        }

        let remote_action = if self.gateway.exists(&scope.target, &old_path).await? {
            self.gateway
                .move_dir(&scope.target, &old_path, &new_path)
                .await?;
            self.gateway
                .set_permissions(&scope.target, &new_path)
                .await?;
            RenameAction::Moved
        } else {
            self.gateway
                .ensure_user_structure(&scope.target, &scope.login)
                .await?;
            self.gateway.create_folder(&scope.target, &new_path).await?;
            RenameAction::Recreated
        };

        info!(
            owner_id = %owner.owner_id,
            folder_id = %id,
            from = %old_name,
            to = %new_name,
            action = ?remote_action,
            "Folder renamed"
        );

        let catalog = self
            .update_catalog_name(&folder, &new_name, &display_name, &new_path)
            .await;
        let media = self
            .rewriter
            .rewrite(owner.owner_id, &scope.segment(&old_name), &new_name)
            .await;

        Ok(RenameOutcome {
            id,
            old_name: old_name.into_inner(),
            new_name: new_name.into_inner(),
            display_name,
            sanitized: changed,
            path: new_path,
            remote_action,
            catalog,
            media,
        })
    }

    /// Deletes an empty folder.
    ///
    /// Rejected with a conflict while catalog media records or remote
    /// files remain. A missing remote directory is not an error.
    pub async fn delete_folder(
        &self,
        owner: &OwnerContext,
        id: FolderId,
    ) -> AppResult<DeleteOutcome> {
        let scope = self.resolve_scope(owner).await?;

        let _folder_guard = self.locks.acquire([LockKey::Folder(id)]).await;
        let (folder, name, scope) = self.load_active(&scope, id).await?;
        let _name_guard = self
            .locks
            .acquire([LockKey::Name(owner.owner_id, name.to_string())])
            .await;

        let segment = scope.segment(&name);
        let path = scope.folder_path(&name);

        let media_count = self
            .catalog
            .count_referencing_media(owner.owner_id, &segment)
            .await?;
        if media_count > 0 {
            return Err(AppError::conflict(
                format!("Folder '{name}' still holds {media_count} media record(s)"),
                ConflictDetail::MediaReferences { count: media_count },
            ));
        }

        let remote_removed = if self.gateway.exists(&scope.target, &path).await? {
            let files = self.gateway.file_count(&scope.target, &path).await?;
            if files > 0 {
                return Err(AppError::conflict(
                    format!("Folder '{name}' still holds {files} file(s)"),
                    ConflictDetail::RemoteFiles { count: files },
                ));
            }
            self.gateway.delete_empty(&scope.target, &path).await?;
            true
        } else {
            false
        };

        info!(
            owner_id = %owner.owner_id,
            folder_id = %id,
            folder = %name,
            remote_removed,
            "Folder deleted"
        );

        let media = SecondaryOutcome::from_rows(
            self.catalog
                .delete_referencing_media(owner.owner_id, &segment)
                .await,
        );
        if let SecondaryOutcome::Failed { error } = &media {
            warn!(folder_id = %id, error = %error, "Failed to purge media records");
        }

        let catalog = match self.catalog.mark_removed(folder.id).await {
            Ok(()) => SecondaryOutcome::Applied { rows: 1 },
            Err(e) => {
                warn!(folder_id = %id, error = %e, "Failed to mark folder removed");
                SecondaryOutcome::failed(&e)
            }
        };

        Ok(DeleteOutcome {
            id,
            path,
            remote_removed,
            media,
            catalog,
        })
    }

    /// Reports catalog and remote usage of a folder.
    ///
    /// Either source may fail independently; its figures are then zero and
    /// carry an error marker.
    pub async fn folder_info(&self, owner: &OwnerContext, id: FolderId) -> AppResult<FolderInfo> {
        let scope = self.resolve_scope(owner).await?;
        let (folder, name, scope) = self.load_active(&scope, id).await?;

        let path = scope.folder_path(&name);
        let usage = self
            .accountant
            .compute_usage(
                owner.owner_id,
                &scope.segment(&name),
                &scope.target,
                &path,
                scope.quota_mb,
            )
            .await;

        if usage.report.is_exceeded() {
            warn!(
                owner_id = %owner.owner_id,
                folder = %name,
                reported_mb = usage.report.reported_mb,
                quota_mb = usage.report.quota_mb,
                "Folder usage has reached the owner quota"
            );
        }

        Ok(FolderInfo {
            id,
            name: name.into_inner(),
            display_name: folder.display_name,
            path,
            catalog: usage.catalog,
            remote: usage.remote,
            usage: usage.report,
        })
    }

    /// Brings a folder's remote directory into shape: ensures it exists,
    /// removes transient files, and normalizes permissions. Safe to re-run.
    ///
    /// Also accepts removed folders, which become active again.
    pub async fn sync_folder(&self, owner: &OwnerContext, id: FolderId) -> AppResult<SyncOutcome> {
        let scope = self.resolve_scope(owner).await?;

        let _folder_guard = self.locks.acquire([LockKey::Folder(id)]).await;
        let (folder, name, scope) = self.load(&scope, id).await?;
        let _name_guard = self
            .locks
            .acquire([LockKey::Name(owner.owner_id, name.to_string())])
            .await;

        let path = scope.folder_path(&name);
        self.gateway
            .ensure_user_structure(&scope.target, &scope.login)
            .await?;
        self.gateway.create_folder(&scope.target, &path).await?;
        let transient_removed = self.gateway.cleanup_transient(&scope.target, &path).await?;
        self.gateway.set_permissions(&scope.target, &path).await?;

        info!(
            owner_id = %owner.owner_id,
            folder_id = %id,
            folder = %name,
            transient_removed,
            "Folder synchronized"
        );

        let catalog = match self.refresh_usage(&folder, &scope, &path).await {
            Ok(mb) => {
                info!(folder_id = %id, space_used_mb = mb, "Usage estimate refreshed");
                SecondaryOutcome::Applied { rows: 1 }
            }
            Err(e) => {
                warn!(folder_id = %id, error = %e, "Failed to refresh usage estimate");
                SecondaryOutcome::failed(&e)
            }
        };

        Ok(SyncOutcome {
            id,
            path,
            transient_removed,
            catalog,
        })
    }

    fn sanitize_input(&self, raw_name: &str) -> AppResult<Sanitized> {
        if raw_name.trim().is_empty() {
            return Err(AppError::validation("Folder name is required"));
        }
        let sanitized = FolderName::sanitize(raw_name);
        if self.gateway.layout().is_reserved(sanitized.name.as_str()) {
            return Err(AppError::validation(format!(
                "'{}' is a reserved directory name",
                sanitized.name
            )));
        }
        Ok(sanitized)
    }

    /// Load a folder of the owner, any status, and rebind the scope to the
    /// target the folder lives on.
    async fn load(
        &self,
        scope: &OwnerScope,
        id: FolderId,
    ) -> AppResult<(Folder, FolderName, OwnerScope)> {
        let folder = self
            .catalog
            .find_folder(scope.owner.owner_id, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        let name = folder.folder_name().ok_or_else(|| {
            AppError::internal(format!(
                "Folder {id} has a non-canonical stored name '{}'",
                folder.name
            ))
        })?;

        let scope = if folder.remote_target_id == scope.target.id {
            scope.clone()
        } else {
            scope.on_target(self.targets.get(folder.remote_target_id)?.clone())
        };

        Ok((folder, name, scope))
    }

    async fn load_active(
        &self,
        scope: &OwnerScope,
        id: FolderId,
    ) -> AppResult<(Folder, FolderName, OwnerScope)> {
        let loaded = self.load(scope, id).await?;
        if !loaded.0.is_active() {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }
        Ok(loaded)
    }

    /// Registers a listed directory unless a concurrent rename or delete
    /// moved it away while the listing was in flight.
    async fn adopt_listed(
        &self,
        scope: &OwnerScope,
        name: &FolderName,
        display_name: &str,
    ) -> Option<FolderSummary> {
        let _guard = self
            .locks
            .acquire([LockKey::Name(scope.owner.owner_id, name.to_string())])
            .await;

        let path = scope.folder_path(name);
        match self.gateway.exists(&scope.target, &path).await {
            Ok(true) => Some(self.adopt(scope, name, display_name, false).await),
            Ok(false) => {
                debug!(
                    owner_id = %scope.owner.owner_id,
                    folder = %name,
                    "Listed folder is gone; not registering it"
                );
                None
            }
            Err(e) => {
                warn!(
                    owner_id = %scope.owner.owner_id,
                    folder = %name,
                    error = %e,
                    "Could not re-check listed folder; leaving it unregistered"
                );
                Some(FolderSummary {
                    id: None,
                    display_name: display_name.to_string(),
                    name: name.to_string(),
                    path,
                    remote_target_id: scope.target.id,
                    kind: "folder".to_string(),
                    synthesized: false,
                })
            }
        }
    }

    /// Upserts the catalog row for `name`. Callers hold its name lock.
    async fn adopt(
        &self,
        scope: &OwnerScope,
        name: &FolderName,
        display_name: &str,
        synthesized: bool,
    ) -> FolderSummary {
        let path = scope.folder_path(name);
        let registered = self
            .catalog
            .register_folder(&NewFolder {
                id: FolderId::new(),
                owner_id: scope.owner.owner_id,
                remote_target_id: scope.target.id,
                display_name: display_name.to_string(),
                name: name.clone(),
                remote_path: path.clone(),
            })
            .await;

        let (id, display_name) = match registered {
            Ok(folder) => (Some(folder.id), folder.display_name),
            Err(e) => {
                warn!(
                    owner_id = %scope.owner.owner_id,
                    folder = %name,
                    error = %e,
                    "Could not register listed folder"
                );
                (None, display_name.to_string())
            }
        };

        FolderSummary {
            id,
            display_name,
            name: name.to_string(),
            path,
            remote_target_id: scope.target.id,
            kind: "folder".to_string(),
            synthesized,
        }
    }

    async fn synthesized_default(&self, scope: &OwnerScope) -> FolderSummary {
        let layout = self.gateway.layout();
        let name = FolderName::sanitize(&layout.default_folder).name;
        let _guard = self
            .locks
            .acquire([LockKey::Name(scope.owner.owner_id, name.to_string())])
            .await;
        self.adopt(scope, &name, &layout.default_folder, true).await
    }

    async fn update_catalog_name(
        &self,
        folder: &Folder,
        name: &FolderName,
        display_name: &str,
        path: &str,
    ) -> SecondaryOutcome {
        match self
            .catalog
            .rename_folder(folder.id, name, display_name, path)
            .await
        {
            Ok(_) => SecondaryOutcome::Applied { rows: 1 },
            Err(e) => {
                warn!(
                    folder_id = %folder.id,
                    folder = %name,
                    error = %e,
                    "Failed to update catalog row after rename"
                );
                SecondaryOutcome::failed(&e)
            }
        }
    }

    async fn refresh_usage(
        &self,
        folder: &Folder,
        scope: &OwnerScope,
        path: &str,
    ) -> AppResult<i64> {
        let bytes = self.gateway.size_bytes(&scope.target, path).await?;
        let mb = i64::try_from(bytes_to_mb(bytes)).unwrap_or(i64::MAX);
        self.catalog.update_usage(folder.id, mb).await?;
        Ok(mb)
    }
}
