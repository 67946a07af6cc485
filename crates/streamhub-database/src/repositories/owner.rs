//! Owner settings repository.

use sqlx::PgPool;

use streamhub_core::error::{AppError, ErrorKind};
use streamhub_core::result::AppResult;
use streamhub_core::types::OwnerId;
use streamhub_entity::owner::OwnerSettings;

/// Repository for per-owner target and quota assignments.
#[derive(Debug, Clone)]
pub struct OwnerSettingsRepository {
    pool: PgPool,
}

impl OwnerSettingsRepository {
    /// Create a new owner settings repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the settings row for an owner.
    pub async fn find(&self, owner_id: OwnerId) -> AppResult<Option<OwnerSettings>> {
        sqlx::query_as::<_, OwnerSettings>(
            "SELECT owner_id, remote_target_id, quota_mb FROM owner_settings WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load owner settings", e))
    }

    /// Insert or replace the settings row for an owner.
    pub async fn upsert(&self, settings: &OwnerSettings) -> AppResult<OwnerSettings> {
        sqlx::query_as::<_, OwnerSettings>(
            "INSERT INTO owner_settings (owner_id, remote_target_id, quota_mb) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (owner_id) DO UPDATE \
             SET remote_target_id = EXCLUDED.remote_target_id, \
                 quota_mb = EXCLUDED.quota_mb, \
                 updated_at = NOW() \
             RETURNING owner_id, remote_target_id, quota_mb",
        )
        .bind(settings.owner_id)
        .bind(settings.remote_target_id)
        .bind(settings.quota_mb)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save owner settings", e))
    }
}
