//! Media repository implementation.
//!
//! Folder membership is a path-component rule, not a foreign key. Queries
//! pre-filter with `LIKE` on the `<login>/<folder>/` needle and then apply
//! [`FolderSegment`] in Rust, so `LIKE` never decides membership alone.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use streamhub_core::error::{AppError, ErrorKind};
use streamhub_core::result::AppResult;
use streamhub_core::types::OwnerId;
use streamhub_entity::folder::FolderName;
use streamhub_entity::media::{FolderSegment, MediaReference, NewMedia};

/// Repository for media rows.
#[derive(Debug, Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    /// Create a new media repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a media item.
    pub async fn create(&self, data: &NewMedia) -> AppResult<MediaReference> {
        sqlx::query_as::<_, MediaReference>(
            "INSERT INTO media (id, owner_id, title, url, path, size_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.owner_id)
        .bind(&data.title)
        .bind(&data.url)
        .bind(&data.path)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create media", e))
    }

    /// All media of an owner, newest first.
    pub async fn find_by_owner(&self, owner_id: OwnerId) -> AppResult<Vec<MediaReference>> {
        sqlx::query_as::<_, MediaReference>(
            "SELECT * FROM media WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list media", e))
    }

    /// Media of an owner that belong to `segment`.
    pub async fn find_in_folder(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<Vec<MediaReference>> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        fetch_in_folder(&mut *conn, owner_id, segment, false).await
    }

    /// Rewrite the folder component of every matching row. Returns rows changed.
    pub async fn rewrite_folder(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
        new_folder: &FolderName,
    ) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let candidates = fetch_in_folder(&mut *tx, owner_id, segment, true).await?;
        let mut rows = 0u64;
        for media in &candidates {
            let Some(update) = segment.rewrite_reference(media, new_folder.as_str()) else {
                continue;
            };
            let result = sqlx::query("UPDATE media SET url = $2, path = $3 WHERE id = $1")
                .bind(update.id)
                .bind(&update.url)
                .bind(&update.path)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to rewrite media path", e)
                })?;
            rows += result.rows_affected();
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit media rewrite", e)
        })?;
        Ok(rows)
    }

    /// Delete every matching row. Returns rows deleted.
    pub async fn delete_in_folder(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let ids: Vec<Uuid> = fetch_in_folder(&mut *tx, owner_id, segment, true)
            .await?
            .into_iter()
            .map(|m| m.id.into_uuid())
            .collect();

        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM media WHERE owner_id = $1 AND id = ANY($2)")
            .bind(owner_id)
            .bind(&ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete media", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit media delete", e)
        })?;
        Ok(result.rows_affected())
    }
}

async fn fetch_in_folder(
    conn: &mut PgConnection,
    owner_id: OwnerId,
    segment: &FolderSegment,
    for_update: bool,
) -> AppResult<Vec<MediaReference>> {
    let sql = if for_update {
        "SELECT * FROM media WHERE owner_id = $1 \
         AND (url LIKE $2 ESCAPE '\\' OR path LIKE $2 ESCAPE '\\') FOR UPDATE"
    } else {
        "SELECT * FROM media WHERE owner_id = $1 \
         AND (url LIKE $2 ESCAPE '\\' OR path LIKE $2 ESCAPE '\\')"
    };

    let rows = sqlx::query_as::<_, MediaReference>(sql)
        .bind(owner_id)
        .bind(like_contains(&segment.needle()))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to query media", e))?;

    Ok(rows.into_iter().filter(|m| segment.references(m)).collect())
}

/// `%needle%` with `LIKE` metacharacters escaped.
fn like_contains(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
