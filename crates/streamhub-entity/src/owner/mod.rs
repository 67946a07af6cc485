//! Owner identity and per-owner settings.

pub mod model;

pub use model::{OwnerContext, OwnerSettings};
