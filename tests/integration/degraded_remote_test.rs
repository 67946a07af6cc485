//! Behavior when the remote store or the catalog is unavailable.

mod helpers;

use std::fs;

use streamhub_core::error::ErrorKind;
use streamhub_service::{RenameAction, SecondaryOutcome};

use helpers::{MIB, TestHarness};

#[tokio::test]
async fn test_listing_with_remote_down_returns_default_and_marker() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    h.service.create_folder(&alice, "clips").await.unwrap();
    h.executor.set_down(true);

    let listing = h.service.list_folders(&alice).await.unwrap();

    assert!(listing.error.as_deref().unwrap().contains("Connection refused"));
    assert_eq!(listing.folders.len(), 1);
    assert_eq!(listing.folders[0].name, "default");
    assert!(listing.folders[0].synthesized);
}

#[tokio::test]
async fn test_create_fails_when_remote_is_down() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    h.executor.set_down(true);

    let err = h.service.create_folder(&alice, "clips").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::RemoteExecution);
    assert!(h.catalog_folders(&alice).await.is_empty());
}

#[tokio::test]
async fn test_create_succeeds_when_catalog_write_fails() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    h.catalog.set_folder_writes_down(true);

    let created = h.service.create_folder(&alice, "clips").await.unwrap();

    assert!(created.catalog.is_failed());
    assert!(h.dir("alice", "clips").is_dir());

    h.catalog.set_folder_writes_down(false);
    let listing = h.service.list_folders(&alice).await.unwrap();
    assert_eq!(listing.folders.len(), 1);
    assert_eq!(listing.folders[0].name, "clips");
    assert!(listing.folders[0].id.is_some());
}

#[tokio::test]
async fn test_info_with_remote_down_reports_catalog_only() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.add_media(&alice, "alice", "clips", "a.mp4", 3 * MIB).await;
    h.executor.set_down(true);

    let info = h.service.folder_info(&alice, created.id).await.unwrap();

    assert!(info.remote.error.is_some());
    assert!(!info.remote.exists);
    assert_eq!(info.remote.size_bytes, 0);
    assert!(info.catalog.error.is_none());
    assert_eq!(info.catalog.media_count, 1);
    assert_eq!(info.usage.catalog_mb, 3);
    assert_eq!(info.usage.remote_mb, 0);
    assert_eq!(info.usage.reported_mb, 3);
}

#[tokio::test]
async fn test_info_with_catalog_media_down_reports_remote_only() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.write_file("alice", "clips", "a.mp4", 2 * MIB as usize);
    h.catalog.set_media_down(true);

    let info = h.service.folder_info(&alice, created.id).await.unwrap();

    assert!(info.catalog.error.is_some());
    assert_eq!(info.catalog.media_count, 0);
    assert!(info.remote.error.is_none());
    assert_eq!(info.remote.file_count, 1);
    assert_eq!(info.usage.catalog_mb, 0);
    assert!(info.usage.remote_mb >= 2);
    assert_eq!(info.usage.reported_mb, info.usage.remote_mb);
}

#[tokio::test]
async fn test_info_with_both_sources_empty() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    fs::remove_dir(h.dir("alice", "clips")).unwrap();

    let info = h.service.folder_info(&alice, created.id).await.unwrap();

    assert!(info.catalog.error.is_none());
    assert!(info.remote.error.is_none());
    assert!(!info.remote.exists);
    assert_eq!(info.usage.reported_mb, 0);
    assert_eq!(info.usage.percent_of_quota, 0);
}

#[tokio::test]
async fn test_info_percent_uses_owner_quota() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    h.assign(&alice, None, Some(20)).await;
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    fs::remove_dir(h.dir("alice", "clips")).unwrap();
    h.add_media(&alice, "alice", "clips", "a.mp4", 5 * MIB).await;

    let info = h.service.folder_info(&alice, created.id).await.unwrap();

    assert_eq!(info.usage.quota_mb, 20);
    assert_eq!(info.usage.reported_mb, 5);
    assert_eq!(info.usage.percent_of_quota, 25);
}

#[tokio::test]
async fn test_info_reports_quota_reached() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    h.assign(&alice, None, Some(4)).await;
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.add_media(&alice, "alice", "clips", "a.mp4", 4 * MIB).await;

    let info = h.service.folder_info(&alice, created.id).await.unwrap();

    assert_eq!(info.usage.reported_mb, 4);
    assert!(info.usage.is_exceeded());
}

#[tokio::test]
async fn test_info_fails_when_folder_lookup_is_unavailable() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.add_media(&alice, "alice", "clips", "a.mp4", MIB).await;
    h.catalog.set_folder_reads_down(true);

    // Without the row there is no path to measure, so neither source is tried.
    let err = h.service.folder_info(&alice, created.id).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Database);
    assert!(h.dir("alice", "clips").is_dir());
}

#[tokio::test]
async fn test_operations_fail_when_owner_settings_are_unavailable() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.catalog.set_settings_down(true);

    let err = h.service.create_folder(&alice, "archive").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);
    assert!(!h.dir("alice", "archive").exists());

    let err = h.service.list_folders(&alice).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);

    let err = h.service.delete_folder(&alice, created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);
    assert!(h.dir("alice", "clips").is_dir());
}

#[tokio::test]
async fn test_delete_aborts_when_media_count_is_unavailable() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.catalog.set_media_down(true);

    let err = h.service.delete_folder(&alice, created.id).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Database);
    assert!(h.dir("alice", "clips").is_dir());
    assert_eq!(h.catalog_folders(&alice).await.len(), 1);
}

#[tokio::test]
async fn test_delete_aborts_when_remote_is_down() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.executor.set_down(true);

    let err = h.service.delete_folder(&alice, created.id).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::RemoteExecution);
    assert_eq!(h.catalog_folders(&alice).await.len(), 1);
}

#[tokio::test]
async fn test_delete_reports_failed_catalog_update() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.catalog.set_folder_writes_down(true);

    let deleted = h.service.delete_folder(&alice, created.id).await.unwrap();

    assert!(deleted.remote_removed);
    assert!(deleted.catalog.is_failed());
    assert!(!h.dir("alice", "clips").exists());
}

#[tokio::test]
async fn test_rename_succeeds_when_media_rewrite_fails() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.catalog.set_media_down(true);

    let renamed = h
        .service
        .rename_folder(&alice, created.id, "archive")
        .await
        .unwrap();

    assert_eq!(renamed.remote_action, RenameAction::Moved);
    assert_eq!(renamed.catalog, SecondaryOutcome::Applied { rows: 1 });
    assert!(renamed.media.is_failed());
    assert!(h.dir("alice", "archive").is_dir());
    assert_eq!(h.catalog_folders(&alice).await[0].name, "archive");
}

#[tokio::test]
async fn test_rename_fails_when_remote_is_down() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.executor.set_down(true);

    let err = h
        .service
        .rename_folder(&alice, created.id, "archive")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::RemoteExecution);
    assert_eq!(h.catalog_folders(&alice).await[0].name, "clips");
}

#[tokio::test]
async fn test_sync_fails_when_remote_is_down() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.executor.set_down(true);

    let err = h.service.sync_folder(&alice, created.id).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::RemoteExecution);
}

#[tokio::test]
async fn test_sync_reports_failed_usage_refresh() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.write_file("alice", "clips", "stale.tmp", 4);
    h.catalog.set_folder_writes_down(true);

    let synced = h.service.sync_folder(&alice, created.id).await.unwrap();

    assert_eq!(synced.transient_removed, 1);
    assert!(synced.catalog.is_failed());
}
