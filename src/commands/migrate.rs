//! Catalog migration command.

use streamhub_core::AppError;
use streamhub_core::config::AppConfig;
use streamhub_database::DatabasePool;

use crate::output;

/// Apply all pending migrations to the configured database
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    streamhub_database::migration::run_migrations(pool.pool()).await?;
    pool.close().await;
    output::print_success("All migrations applied.");
    Ok(())
}
