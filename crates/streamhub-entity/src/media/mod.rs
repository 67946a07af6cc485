//! Media reference entities and folder path matching.

pub mod model;
pub mod segment;

pub use model::{MediaPathUpdate, MediaReference, NewMedia};
pub use segment::FolderSegment;
