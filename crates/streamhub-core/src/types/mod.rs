//! Core type definitions used across the StreamHub workspace.

pub mod id;

pub use id::*;
