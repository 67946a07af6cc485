//! # streamhub-entity
//!
//! Domain entity models for StreamHub. Every struct in this crate
//! represents a catalog row or a domain value object. Catalog rows
//! additionally derive `sqlx::FromRow`.
//!
//! The folder naming rule and the media path-component rule live here
//! because every catalog backend must apply them identically.

pub mod folder;
pub mod media;
pub mod owner;
pub mod usage;
