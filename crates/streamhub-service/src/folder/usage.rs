//! Usage accounting from the catalog and the remote store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use streamhub_core::result::AppResult;
use streamhub_core::traits::RemoteTarget;
use streamhub_core::types::OwnerId;
use streamhub_database::FolderCatalog;
use streamhub_entity::media::FolderSegment;
use streamhub_entity::usage::UsageReport;
use streamhub_remote::RemoteFolderGateway;

use super::outcome::{CatalogUsage, RemoteUsage};

/// Usage of one folder from both sources plus the reconciled report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderUsage {
    /// Catalog figures.
    pub catalog: CatalogUsage,
    /// Remote figures.
    pub remote: RemoteUsage,
    /// Reconciled report.
    pub report: UsageReport,
}

/// Derives space-used figures for a folder.
///
/// Each source is read independently. A failing source contributes zero
/// and carries an error marker; the other source is still reported.
#[derive(Debug, Clone)]
pub struct UsageAccountant {
    catalog: Arc<dyn FolderCatalog>,
    gateway: RemoteFolderGateway,
}

impl UsageAccountant {
    /// Create an accountant.
    pub fn new(catalog: Arc<dyn FolderCatalog>, gateway: RemoteFolderGateway) -> Self {
        Self { catalog, gateway }
    }

    /// Media count and byte total according to the catalog.
    pub async fn catalog_usage(&self, owner_id: OwnerId, segment: &FolderSegment) -> CatalogUsage {
        match self.read_catalog(owner_id, segment).await {
            Ok((media_count, total_bytes)) => CatalogUsage {
                media_count,
                total_bytes,
                error: None,
            },
            Err(e) => {
                warn!(
                    owner_id = %owner_id,
                    folder = segment.folder(),
                    error = %e,
                    "Catalog usage unavailable"
                );
                CatalogUsage {
                    error: Some(e.to_string()),
                    ..CatalogUsage::default()
                }
            }
        }
    }

    /// Existence, file count and size according to the remote store.
    pub async fn remote_usage(&self, target: &RemoteTarget, path: &str) -> RemoteUsage {
        self.read_remote(target, path).await.unwrap_or_else(|e| {
            warn!(target_id = %target.id, path, error = %e, "Remote usage unavailable");
            RemoteUsage {
                error: Some(e.to_string()),
                ..RemoteUsage::default()
            }
        })
    }

    async fn read_catalog(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<(u64, u64)> {
        let media_count = self
            .catalog
            .count_referencing_media(owner_id, segment)
            .await?;
        let total_bytes = self.catalog.sum_media_bytes(owner_id, segment).await?;
        Ok((media_count, total_bytes))
    }

    async fn read_remote(&self, target: &RemoteTarget, path: &str) -> AppResult<RemoteUsage> {
        if !self.gateway.exists(target, path).await? {
            return Ok(RemoteUsage::default());
        }
        Ok(RemoteUsage {
            exists: true,
            file_count: self.gateway.file_count(target, path).await?,
            size_bytes: self.gateway.size_bytes(target, path).await?,
            error: None,
        })
    }

    /// Both sources and the reconciled report against `quota_mb`.
    pub async fn compute_usage(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
        target: &RemoteTarget,
        path: &str,
        quota_mb: u64,
    ) -> FolderUsage {
        let catalog = self.catalog_usage(owner_id, segment).await;
        let remote = self.remote_usage(target, path).await;

        let report = UsageReport::new(
            catalog.error.is_none().then_some(catalog.total_bytes),
            remote.error.is_none().then_some(remote.size_bytes),
            quota_mb,
        );

        FolderUsage {
            catalog,
            remote,
            report,
        }
    }
}
