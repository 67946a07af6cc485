//! Remote execution errors.

use thiserror::Error;

use streamhub_core::error::{AppError, ErrorKind};

/// Failure to run a remote script.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The local process (shell or ssh client) could not be started.
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The script did not finish in time.
    #[error("Remote command timed out after {0} seconds")]
    Timeout(u64),

    /// The script exited unsuccessfully.
    #[error("Remote command failed with exit code {code}: {stderr}")]
    ProcessFailed {
        /// Exit code, `-1` when killed by a signal.
        code: i32,
        /// Captured stderr, truncated.
        stderr: String,
    },
}

impl From<ExecutorError> for AppError {
    fn from(err: ExecutorError) -> Self {
        let message = err.to_string();
        AppError::with_source(ErrorKind::RemoteExecution, message, err)
    }
}
