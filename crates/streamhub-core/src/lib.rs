//! # streamhub-core
//!
//! Core crate for StreamHub. Contains the unified error system,
//! configuration schemas, typed identifiers, and the remote execution
//! trait implemented by `streamhub-remote`.
//!
//! This crate has **no** internal dependencies on other StreamHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
