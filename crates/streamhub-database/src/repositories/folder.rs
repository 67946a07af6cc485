//! Folder repository implementation.

use sqlx::PgPool;

use streamhub_core::error::{AppError, ErrorKind};
use streamhub_core::result::AppResult;
use streamhub_core::types::{FolderId, OwnerId, RemoteTargetId};
use streamhub_entity::folder::{Folder, FolderName, FolderStatus, NewFolder};

const UNIQUE_NAME_CONSTRAINT: &str = "folders_owner_id_name_remote_target_id_key";

/// Repository for folder rows.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active folders of an owner, ordered by name.
    pub async fn find_by_owner(&self, owner_id: OwnerId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner_id = $1 AND status = 'active' ORDER BY name ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Find a folder by ID, scoped to its owner.
    pub async fn find_by_id(&self, owner_id: OwnerId, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find a folder by its canonical name on a target.
    pub async fn find_by_name(
        &self,
        owner_id: OwnerId,
        target: RemoteTargetId,
        name: &FolderName,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner_id = $1 AND remote_target_id = $2 AND name = $3",
        )
        .bind(owner_id)
        .bind(target)
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find folder by name", e)
        })
    }

    /// Insert a folder, or reactivate and return the existing row with the
    /// same (owner, name, target).
    pub async fn upsert(&self, data: &NewFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, owner_id, remote_target_id, display_name, name, remote_path) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (owner_id, name, remote_target_id) DO UPDATE \
             SET status = 'active', \
                 remote_path = EXCLUDED.remote_path, \
                 display_name = CASE WHEN folders.status = 'removed' \
                     THEN EXCLUDED.display_name ELSE folders.display_name END, \
                 updated_at = NOW() \
             RETURNING *",
        )
        .bind(data.id)
        .bind(data.owner_id)
        .bind(data.remote_target_id)
        .bind(&data.display_name)
        .bind(data.name.as_str())
        .bind(&data.remote_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to register folder", e))
    }

    /// Change a folder's name, display name and path.
    ///
    /// A removed row already holding the new name is discarded first; an
    /// active one is a conflict.
    pub async fn rename(
        &self,
        id: FolderId,
        name: &FolderName,
        display_name: &str,
        remote_path: &str,
    ) -> AppResult<Folder> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query(
            "DELETE FROM folders f USING folders cur \
             WHERE cur.id = $1 AND f.id <> cur.id \
               AND f.owner_id = cur.owner_id \
               AND f.remote_target_id = cur.remote_target_id \
               AND f.name = $2 AND f.status = 'removed'",
        )
        .bind(id)
        .bind(name.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear removed folder", e)
        })?;

        let folder = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, display_name = $3, remote_path = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name.as_str())
        .bind(display_name)
        .bind(remote_path)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(UNIQUE_NAME_CONSTRAINT) =>
            {
                AppError::database(format!("Folder name '{name}' is already registered"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to rename folder", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder rename", e)
        })?;

        Ok(folder)
    }

    /// Set a folder's lifecycle status.
    pub async fn set_status(&self, id: FolderId, status: FolderStatus) -> AppResult<()> {
        sqlx::query("UPDATE folders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update folder status", e)
            })?;
        Ok(())
    }

    /// Record a fresh usage estimate and mark the folder active.
    pub async fn update_usage(&self, id: FolderId, space_used_mb: i64) -> AppResult<()> {
        sqlx::query(
            "UPDATE folders SET space_used_mb = $2, status = 'active', updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(space_used_mb)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update folder usage", e)
        })?;
        Ok(())
    }
}
