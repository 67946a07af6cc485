//! # streamhub-remote
//!
//! Everything that touches the remote store. The store is reachable only
//! by running shell commands, so this crate provides:
//!
//! - [`commands`]: the fixed script vocabulary, with path quoting.
//! - [`executor`]: `local` (`sh -c`) and `ssh` implementations of
//!   [`streamhub_core::traits::RemoteExecutor`].
//! - [`TargetRegistry`]: configured remote targets by id.
//! - [`RemoteFolderGateway`]: typed folder operations built on the above.

pub mod commands;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod registry;

pub use error::ExecutorError;
pub use executor::{LocalShellExecutor, SshExecutor, build_executor};
pub use gateway::RemoteFolderGateway;
pub use registry::TargetRegistry;
