//! # streamhub-service
//!
//! Business logic for StreamHub folders. [`FolderService`] runs every
//! user-facing operation as an ordered sequence against the remote store
//! (primary) and the catalog (secondary), under a per-folder lock.
//!
//! Services follow constructor injection: all collaborators are provided
//! at construction time.

pub mod context;
pub mod folder;

pub use context::OwnerScope;
pub use folder::{
    CreateOutcome, DeleteOutcome, FolderInfo, FolderListing, FolderLocks, FolderService,
    FolderSummary, PathRewriter, RemoteUsage, RenameAction, RenameOutcome, SecondaryOutcome,
    SyncOutcome, UsageAccountant,
};
