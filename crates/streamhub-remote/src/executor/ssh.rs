//! Executor that runs scripts over the system `ssh` client.
//!
//! Authentication is non-interactive (`BatchMode=yes`): keys or an agent
//! must already be set up for `user@host`.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use streamhub_core::AppError;
use streamhub_core::result::AppResult;
use streamhub_core::traits::{CommandOutput, RemoteExecutor, RemoteTarget};

/// Runs scripts on the target host with `ssh`.
#[derive(Debug, Clone)]
pub struct SshExecutor {
    timeout: Duration,
}

impl SshExecutor {
    /// Create an executor with a per-command timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn command(&self, target: &RemoteTarget, script: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.args(["-o", "BatchMode=yes"])
            .arg("-o")
            .arg(format!("ConnectTimeout={}", self.timeout.as_secs().max(1)))
            .arg("-p")
            .arg(target.port.to_string())
            .arg(format!("{}@{}", target.user, target.host))
            .arg("--")
            .arg(script);
        cmd
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    fn executor_type(&self) -> &str {
        "ssh"
    }

    async fn execute(&self, target: &RemoteTarget, script: &str) -> AppResult<CommandOutput> {
        if target.host.is_empty() {
            return Err(AppError::configuration(format!(
                "Remote target {} has no host configured",
                target.id
            )));
        }
        debug!(target_id = %target.id, host = %target.host, script, "Running remote script");
        Ok(super::run(self.command(target, script), "ssh", self.timeout).await?)
    }
}
