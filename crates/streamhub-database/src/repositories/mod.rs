//! PostgreSQL repositories backing the catalog.

pub mod folder;
pub mod media;
pub mod owner;

pub use folder::FolderRepository;
pub use media::MediaRepository;
pub use owner::OwnerSettingsRepository;
