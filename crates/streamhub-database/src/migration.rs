//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use streamhub_core::error::{AppError, ErrorKind};

/// Apply all pending catalog migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Applying catalog migrations");

    let migrator = sqlx::migrate!("../../migrations");
    let pending = migrator.iter().count();

    migrator.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!(known_migrations = pending, "Catalog schema is up to date");
    Ok(())
}
