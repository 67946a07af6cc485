//! Remote command execution trait.
//!
//! The remote store has no filesystem API; every read or mutation is a
//! shell script run against a [`RemoteTarget`]. Transport concerns
//! (connections, authentication, retries) live behind this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::RemoteTargetConfig;
use crate::result::AppResult;
use crate::types::RemoteTargetId;

/// A resolved remote host/account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTarget {
    /// Target identifier.
    pub id: RemoteTargetId,
    /// Human-readable name.
    pub name: String,
    /// Host name.
    pub host: String,
    /// SSH port.
    pub port: u16,
    /// SSH user.
    pub user: String,
    /// Directory holding one subdirectory per owner login.
    pub base_path: String,
}

impl RemoteTarget {
    /// Root directory of an owner on this target.
    pub fn owner_root(&self, login: &str) -> String {
        format!("{}/{}", self.base_path.trim_end_matches('/'), login)
    }

    /// Directory of a single folder on this target.
    pub fn folder_path(&self, login: &str, folder: &str) -> String {
        format!("{}/{}", self.owner_root(login), folder)
    }
}

impl From<&RemoteTargetConfig> for RemoteTarget {
    fn from(config: &RemoteTargetConfig) -> Self {
        Self {
            id: RemoteTargetId(config.id),
            name: config.name.clone(),
            host: config.host.clone(),
            port: config.port,
            user: config.user.clone(),
            base_path: config.base_path.clone(),
        }
    }
}

/// Captured result of a successfully executed remote script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Non-empty, trimmed stdout lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Executes shell scripts on a remote target.
///
/// Implementations must return an error when the script cannot be
/// delivered or exits with a non-zero status. No retries are performed.
#[async_trait]
pub trait RemoteExecutor: Send + Sync + std::fmt::Debug + 'static {
    /// Return the executor type name (e.g., "ssh", "local").
    fn executor_type(&self) -> &str;

    /// Run `script` on `target` and capture its output.
    async fn execute(&self, target: &RemoteTarget, script: &str) -> AppResult<CommandOutput>;
}
