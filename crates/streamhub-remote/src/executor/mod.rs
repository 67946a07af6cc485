//! Command executors.
//!
//! Both executors spawn a local child process (`sh` or `ssh`) with a
//! timeout and map a non-zero exit into [`ExecutorError::ProcessFailed`].

pub mod local;
pub mod ssh;

use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, warn};

use streamhub_core::AppError;
use streamhub_core::config::RemoteConfig;
use streamhub_core::result::AppResult;
use streamhub_core::traits::{CommandOutput, RemoteExecutor};

use crate::error::ExecutorError;

pub use local::LocalShellExecutor;
pub use ssh::SshExecutor;

const MAX_STDERR_CHARS: usize = 2000;

/// Build the executor named by `config.executor`.
pub fn build_executor(config: &RemoteConfig) -> AppResult<Arc<dyn RemoteExecutor>> {
    let timeout = Duration::from_secs(config.command_timeout_seconds);
    match config.executor.as_str() {
        "ssh" => Ok(Arc::new(SshExecutor::new(timeout))),
        "local" => Ok(Arc::new(LocalShellExecutor::new(timeout))),
        other => Err(AppError::configuration(format!(
            "Unknown remote executor: '{other}'. Supported: ssh, local"
        ))),
    }
}

/// Run a prepared command to completion, capturing its output.
pub(crate) async fn run(
    mut cmd: Command,
    program: &str,
    timeout: Duration,
) -> Result<CommandOutput, ExecutorError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();
    let result = tokio::time::timeout(timeout, cmd.output()).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(output)) => {
            let stdout = String::from_utf8_lossy(&output.stdout).to_string();
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();

            if !output.status.success() {
                let code = output.status.code().unwrap_or(-1);
                warn!(program, code, elapsed_ms, stderr = %stderr.trim(), "Remote command failed");
                return Err(ExecutorError::ProcessFailed {
                    code,
                    stderr: stderr.trim().chars().take(MAX_STDERR_CHARS).collect(),
                });
            }

            debug!(program, elapsed_ms, "Remote command completed");
            Ok(CommandOutput { stdout, stderr })
        }
        Ok(Err(source)) => Err(ExecutorError::Spawn {
            program: program.to_string(),
            source,
        }),
        Err(_) => {
            warn!(program, timeout_secs = timeout.as_secs(), "Remote command timed out");
            Err(ExecutorError::Timeout(timeout.as_secs()))
        }
    }
}
