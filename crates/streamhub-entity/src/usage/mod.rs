//! Space usage value objects.

pub mod report;

pub use report::{UsageReport, bytes_to_mb};
