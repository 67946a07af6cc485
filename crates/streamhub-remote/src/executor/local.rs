//! Executor that runs scripts with the local `sh`.
//!
//! Used when the "remote" store is mounted on the same host, and by tests.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use streamhub_core::result::AppResult;
use streamhub_core::traits::{CommandOutput, RemoteExecutor, RemoteTarget};

/// Runs scripts through `sh -c` on this machine.
#[derive(Debug, Clone)]
pub struct LocalShellExecutor {
    timeout: Duration,
}

impl LocalShellExecutor {
    /// Create an executor with a per-command timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl RemoteExecutor for LocalShellExecutor {
    fn executor_type(&self) -> &str {
        "local"
    }

    async fn execute(&self, target: &RemoteTarget, script: &str) -> AppResult<CommandOutput> {
        debug!(target_id = %target.id, script, "Running local script");
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        Ok(super::run(cmd, "sh", self.timeout).await?)
    }
}
