//! Folder reconciliation: coordinator, collaborators, and result types.

pub mod locks;
pub mod outcome;
pub mod rewriter;
pub mod service;
pub mod usage;

pub use locks::{FolderGuard, FolderLocks, LockKey};
pub use outcome::{
    CatalogUsage, CreateOutcome, DeleteOutcome, FolderInfo, FolderListing, FolderSummary,
    RemoteUsage, RenameAction, RenameOutcome, SecondaryOutcome, SyncOutcome,
};
pub use rewriter::PathRewriter;
pub use service::FolderService;
pub use usage::{FolderUsage, UsageAccountant};
