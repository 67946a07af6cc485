//! Keyed mutual exclusion for folder operations.
//!
//! Keys are acquired in sorted order (every `Folder` key sorts before
//! every `Name` key), so two operations can never wait on each other in a
//! cycle. A lock entry is dropped from the table once no guard or waiter
//! holds it.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

use streamhub_core::types::{FolderId, OwnerId};

/// Something an operation can lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LockKey {
    /// A folder by id.
    Folder(FolderId),
    /// A canonical folder name of an owner.
    Name(OwnerId, String),
}

type LockTable = DashMap<LockKey, Arc<Mutex<()>>>;

/// Lock table shared by all operations of a service.
#[derive(Debug, Clone, Default)]
pub struct FolderLocks {
    table: Arc<LockTable>,
}

impl FolderLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for every key in `keys`, in sorted order.
    pub async fn acquire(&self, keys: impl IntoIterator<Item = LockKey>) -> FolderGuard {
        let mut keys: Vec<LockKey> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut held = Vec::with_capacity(keys.len());
        for key in keys {
            let mutex = self
                .table
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone();
            trace!(?key, "Waiting for folder lock");
            let guard = mutex.lock_owned().await;
            held.push((key, guard));
        }

        FolderGuard {
            table: Arc::clone(&self.table),
            held,
        }
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Holds a set of folder locks until dropped.
#[derive(Debug)]
pub struct FolderGuard {
    table: Arc<LockTable>,
    held: Vec<(LockKey, OwnedMutexGuard<()>)>,
}

impl Drop for FolderGuard {
    fn drop(&mut self) {
        for (key, guard) in self.held.drain(..).rev() {
            drop(guard);
            self.table
                .remove_if(&key, |_, mutex| Arc::strong_count(mutex) == 1);
        }
    }
}
