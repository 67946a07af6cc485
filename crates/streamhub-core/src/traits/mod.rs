//! Core traits defined in `streamhub-core` and implemented by other crates.

pub mod executor;

pub use executor::{CommandOutput, RemoteExecutor, RemoteTarget};
