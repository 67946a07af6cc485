//! Folder domain entities.

pub mod model;
pub mod name;

pub use model::{Folder, FolderStatus, NewFolder};
pub use name::{FolderName, Sanitized};
