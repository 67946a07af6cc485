//! Folder catalog backend configuration.

use serde::{Deserialize, Serialize};

/// Selects where folder and media bookkeeping is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog provider. Only `"postgres"` persists between runs.
    #[serde(default = "default_provider")]
    pub provider: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
        }
    }
}

fn default_provider() -> String {
    "postgres".to_string()
}
