//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod catalog;
pub mod database;
pub mod logging;
pub mod quota;
pub mod remote;

use serde::{Deserialize, Serialize};

pub use self::catalog::CatalogConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::quota::QuotaConfig;
pub use self::remote::{LayoutConfig, RemoteConfig, RemoteTargetConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Folder catalog backend selection.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Remote host execution and directory layout.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Usage quota settings.
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the given base file with an optional environment-specific
    /// overlay (`config/{env}.toml`) and environment variables prefixed
    /// with `STREAMHUB_`.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("STREAMHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
