//! Propagation of folder renames to media records.

use std::sync::Arc;

use tracing::{info, warn};

use streamhub_core::types::OwnerId;
use streamhub_database::FolderCatalog;
use streamhub_entity::folder::FolderName;
use streamhub_entity::media::FolderSegment;

use super::outcome::SecondaryOutcome;

/// Rewrites media URLs and paths after a folder moves.
///
/// Only the folder path component directly under the owner's login is
/// replaced. Substring look-alikes and other owners' rows are left alone.
#[derive(Debug, Clone)]
pub struct PathRewriter {
    catalog: Arc<dyn FolderCatalog>,
}

impl PathRewriter {
    /// Create a rewriter over `catalog`.
    pub fn new(catalog: Arc<dyn FolderCatalog>) -> Self {
        Self { catalog }
    }

    /// Move the owner's media records from `from` to `to`.
    ///
    /// Never fails: a catalog error is logged and returned as
    /// [`SecondaryOutcome::Failed`].
    pub async fn rewrite(
        &self,
        owner_id: OwnerId,
        from: &FolderSegment,
        to: &FolderName,
    ) -> SecondaryOutcome {
        if from.folder() == to.as_str() {
            return SecondaryOutcome::Skipped;
        }

        match self.catalog.rewrite_media_paths(owner_id, from, to).await {
            Ok(rows) => {
                info!(
                    owner_id = %owner_id,
                    from = from.folder(),
                    to = %to,
                    rows,
                    "Rewrote media paths"
                );
                SecondaryOutcome::Applied { rows }
            }
            Err(e) => {
                warn!(
                    owner_id = %owner_id,
                    from = from.folder(),
                    to = %to,
                    error = %e,
                    "Media path rewrite failed; records still point at the old folder"
                );
                SecondaryOutcome::failed(&e)
            }
        }
    }
}
