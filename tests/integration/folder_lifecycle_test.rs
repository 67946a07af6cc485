//! Folder lifecycle against a healthy remote store and catalog.

mod helpers;

use std::fs;
use std::time::Duration;

use streamhub_core::error::{ConflictDetail, ErrorKind};
use streamhub_service::{RenameAction, SecondaryOutcome};

use helpers::{MIB, TestHarness};

#[tokio::test]
async fn test_create_sanitizes_and_creates_remote_directory() {
    let h = TestHarness::new();
    let alice = h.owner("alice");

    let created = h.service.create_folder(&alice, "Summer Clips!").await.unwrap();

    assert_eq!(created.name, "summer_clips");
    assert_eq!(created.original_name, "Summer Clips!");
    assert!(created.sanitized);
    assert_eq!(created.catalog, SecondaryOutcome::Applied { rows: 1 });
    assert!(h.dir("alice", "summer_clips").is_dir());
    assert!(h.dir("alice", "recordings").is_dir());
    assert!(h.dir("alice", "logs").is_dir());

    let folders = h.catalog_folders(&alice).await;
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].id, created.id);
    assert_eq!(folders[0].display_name, "Summer Clips!");
}

#[tokio::test]
async fn test_created_folder_is_listed_exactly_once() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "highlights").await.unwrap();
    assert!(!created.sanitized);

    let first = h.service.list_folders(&alice).await.unwrap();
    let second = h.service.list_folders(&alice).await.unwrap();

    for listing in [&first, &second] {
        assert!(listing.error.is_none());
        assert_eq!(listing.folders.len(), 1);
        assert_eq!(listing.folders[0].name, "highlights");
        assert_eq!(listing.folders[0].id, Some(created.id));
        assert!(!listing.folders[0].synthesized);
    }
    assert_eq!(h.catalog_folders(&alice).await.len(), 1);
}

#[tokio::test]
async fn test_empty_owner_gets_synthesized_default() {
    let h = TestHarness::new();
    let alice = h.owner("alice");

    let listing = h.service.list_folders(&alice).await.unwrap();

    assert!(listing.error.is_none());
    assert_eq!(listing.folders.len(), 1);
    let default = &listing.folders[0];
    assert_eq!(default.name, "default");
    assert!(default.synthesized);
    assert!(default.id.is_some());

    let again = h.service.list_folders(&alice).await.unwrap();
    assert_eq!(again.folders[0].id, default.id);
}

#[tokio::test]
async fn test_listing_adopts_out_of_band_directories() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    fs::create_dir_all(h.dir("alice", "uploaded_by_ftp")).unwrap();
    fs::create_dir_all(h.dir("alice", "Not Canonical")).unwrap();
    fs::create_dir_all(h.dir("alice", "recordings")).unwrap();

    let listing = h.service.list_folders(&alice).await.unwrap();

    let names: Vec<&str> = listing.folders.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["uploaded_by_ftp"]);
    let catalog = h.catalog_folders(&alice).await;
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].name, "uploaded_by_ftp");
}

#[tokio::test]
async fn test_reserved_and_empty_names_are_rejected() {
    let h = TestHarness::new();
    let alice = h.owner("alice");

    for raw in ["", "   ", "Recordings", "logs"] {
        let err = h.service.create_folder(&alice, raw).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "input {raw:?}");
    }
    assert!(h.catalog_folders(&alice).await.is_empty());
}

#[tokio::test]
async fn test_delete_blocked_by_media_references() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.add_media(&alice, "alice", "clips", "a.mp4", 10).await;
    h.add_media(&alice, "alice", "clips", "b.mp4", 10).await;

    let err = h.service.delete_folder(&alice, created.id).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.conflict, Some(ConflictDetail::MediaReferences { count: 2 }));
    assert!(h.dir("alice", "clips").is_dir());
    assert_eq!(h.catalog_folders(&alice).await.len(), 1);
}

#[tokio::test]
async fn test_delete_blocked_by_remote_files() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.write_file("alice", "clips", "raw/one.mp4", 16);

    let err = h.service.delete_folder(&alice, created.id).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.conflict, Some(ConflictDetail::RemoteFiles { count: 1 }));
    assert!(h.dir("alice", "clips").join("raw/one.mp4").is_file());
}

#[tokio::test]
async fn test_delete_empty_folder() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();

    let deleted = h.service.delete_folder(&alice, created.id).await.unwrap();

    assert!(deleted.remote_removed);
    assert_eq!(deleted.catalog, SecondaryOutcome::Applied { rows: 1 });
    assert_eq!(deleted.media, SecondaryOutcome::Applied { rows: 0 });
    assert!(!h.dir("alice", "clips").exists());
    assert!(h.catalog_folders(&alice).await.is_empty());

    let err = h.service.folder_info(&alice, created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = h.service.delete_folder(&alice, created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_with_remote_directory_already_gone() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    fs::remove_dir(h.dir("alice", "clips")).unwrap();

    let deleted = h.service.delete_folder(&alice, created.id).await.unwrap();

    assert!(!deleted.remote_removed);
    assert_eq!(deleted.catalog, SecondaryOutcome::Applied { rows: 1 });
    assert!(h.catalog_folders(&alice).await.is_empty());
}

#[tokio::test]
async fn test_recreate_after_delete_reuses_identity() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let first = h.service.create_folder(&alice, "clips").await.unwrap();
    h.service.delete_folder(&alice, first.id).await.unwrap();

    let second = h.service.create_folder(&alice, "Clips").await.unwrap();

    assert_eq!(second.id, first.id);
    let folders = h.catalog_folders(&alice).await;
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].display_name, "Clips");
}

#[tokio::test]
async fn test_rename_moves_directory_with_contents() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.write_file("alice", "clips", "a.mp4", 32);

    let renamed = h
        .service
        .rename_folder(&alice, created.id, "Summer Clips!")
        .await
        .unwrap();

    assert_eq!(renamed.remote_action, RenameAction::Moved);
    assert_eq!(renamed.old_name, "clips");
    assert_eq!(renamed.new_name, "summer_clips");
    assert!(renamed.sanitized);
    assert_eq!(renamed.catalog, SecondaryOutcome::Applied { rows: 1 });
    assert!(!h.dir("alice", "clips").exists());
    assert!(h.dir("alice", "summer_clips").join("a.mp4").is_file());

    let folders = h.catalog_folders(&alice).await;
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].id, created.id);
    assert_eq!(folders[0].name, "summer_clips");
    assert_eq!(folders[0].display_name, "Summer Clips!");
    assert!(folders[0].remote_path.ends_with("/alice/summer_clips"));
}

#[tokio::test]
async fn test_rename_recreates_missing_directory() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    fs::remove_dir(h.dir("alice", "clips")).unwrap();

    let renamed = h
        .service
        .rename_folder(&alice, created.id, "archive")
        .await
        .unwrap();

    assert_eq!(renamed.remote_action, RenameAction::Recreated);
    assert!(h.dir("alice", "archive").is_dir());
    assert!(!h.dir("alice", "clips").exists());
}

#[tokio::test]
async fn test_rename_onto_taken_name_is_a_conflict() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let clips = h.service.create_folder(&alice, "clips").await.unwrap();
    h.service.create_folder(&alice, "archive").await.unwrap();
    fs::create_dir_all(h.dir("alice", "manual")).unwrap();

    let err = h
        .service
        .rename_folder(&alice, clips.id, "Archive")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.conflict, Some(ConflictDetail::NameTaken));

    let err = h
        .service
        .rename_folder(&alice, clips.id, "manual")
        .await
        .unwrap_err();
    assert_eq!(err.conflict, Some(ConflictDetail::NameTaken));

    assert!(h.dir("alice", "clips").is_dir());
    let folders = h.catalog_folders(&alice).await;
    let folder = folders.iter().find(|f| f.id == clips.id).expect("still registered");
    assert_eq!(folder.name, "clips");
}

#[tokio::test]
async fn test_rename_to_same_canonical_name_only_updates_display_name() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.add_media(&alice, "alice", "clips", "a.mp4", 10).await;

    let renamed = h
        .service
        .rename_folder(&alice, created.id, "CLIPS")
        .await
        .unwrap();

    assert_eq!(renamed.remote_action, RenameAction::Unchanged);
    assert_eq!(renamed.media, SecondaryOutcome::Skipped);
    assert_eq!(renamed.catalog, SecondaryOutcome::Applied { rows: 1 });
    assert!(h.dir("alice", "clips").is_dir());
    assert_eq!(h.catalog_folders(&alice).await[0].display_name, "CLIPS");
}

#[tokio::test]
async fn test_sync_cleans_transient_files_and_is_idempotent() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.write_file("alice", "clips", "upload.tmp", 8);
    h.write_file("alice", "clips", "chunk.part", 8);
    h.write_file("alice", "clips", "empty.mp4", 0);
    h.write_file("alice", "clips", "keep.mp4", 64);

    let first = h.service.sync_folder(&alice, created.id).await.unwrap();
    assert_eq!(first.transient_removed, 3);
    assert_eq!(first.catalog, SecondaryOutcome::Applied { rows: 1 });

    let second = h.service.sync_folder(&alice, created.id).await.unwrap();
    assert_eq!(second.transient_removed, 0);

    let dir = h.dir("alice", "clips");
    assert!(dir.join("keep.mp4").is_file());
    assert!(!dir.join("upload.tmp").exists());
    assert!(!dir.join("chunk.part").exists());
    assert!(!dir.join("empty.mp4").exists());
}

#[tokio::test]
async fn test_sync_refreshes_usage_estimate() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.write_file("alice", "clips", "big.mp4", 3 * MIB as usize);

    h.service.sync_folder(&alice, created.id).await.unwrap();

    let folders = h.catalog_folders(&alice).await;
    assert!(folders[0].space_used_mb >= 3);
}

#[tokio::test]
async fn test_sync_restores_missing_directory_and_reactivates() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.service.delete_folder(&alice, created.id).await.unwrap();
    assert!(h.catalog_folders(&alice).await.is_empty());

    h.service.sync_folder(&alice, created.id).await.unwrap();

    assert!(h.dir("alice", "clips").is_dir());
    assert_eq!(h.catalog_folders(&alice).await.len(), 1);
}

#[tokio::test]
async fn test_info_reports_both_sources() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    h.write_file("alice", "clips", "a.mp4", 2 * MIB as usize);
    h.add_media(&alice, "alice", "clips", "a.mp4", 5 * MIB).await;

    let info = h.service.folder_info(&alice, created.id).await.unwrap();

    assert_eq!(info.name, "clips");
    assert_eq!(info.catalog.media_count, 1);
    assert_eq!(info.catalog.total_bytes, 5 * MIB as u64);
    assert!(info.catalog.error.is_none());
    assert!(info.remote.exists);
    assert_eq!(info.remote.file_count, 1);
    assert!(info.remote.error.is_none());
    assert_eq!(info.usage.catalog_mb, 5);
    assert!(info.usage.remote_mb >= 2);
    assert_eq!(
        info.usage.reported_mb,
        info.usage.catalog_mb.max(info.usage.remote_mb)
    );
    assert_eq!(info.usage.quota_mb, 1000);
}

#[tokio::test]
async fn test_owner_assigned_to_another_target() {
    let h = TestHarness::new();
    let bob = h.owner("bob");
    h.assign(&bob, Some(2), None).await;

    let created = h.service.create_folder(&bob, "clips").await.unwrap();

    assert_eq!(created.remote_target_id.0, 2);
    assert!(h.secondary_dir("bob", "clips").is_dir());
    assert!(!h.dir("bob", "clips").exists());

    let info = h.service.folder_info(&bob, created.id).await.unwrap();
    assert!(info.remote.exists);

    let listing = h.service.list_folders(&bob).await.unwrap();
    assert_eq!(listing.folders.len(), 1);
    assert_eq!(listing.folders[0].remote_target_id.0, 2);
}

#[tokio::test]
async fn test_unknown_target_is_a_configuration_error() {
    let h = TestHarness::new();
    let carol = h.owner("carol");
    h.assign(&carol, Some(9), None).await;

    let err = h.service.create_folder(&carol, "clips").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Configuration);
    assert!(!h.dir("carol", "clips").exists());
}

#[tokio::test]
async fn test_owners_are_isolated() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let bob = h.owner("bob");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();

    let err = h.service.folder_info(&bob, created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = h.service.delete_folder(&bob, created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(h.dir("alice", "clips").is_dir());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_of_same_name_converge() {
    let h = TestHarness::new();
    let alice = h.owner("alice");

    let (a, b, c) = tokio::join!(
        h.service.create_folder(&alice, "clips"),
        h.service.create_folder(&alice, "Clips"),
        h.service.create_folder(&alice, "clips!"),
    );
    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

    assert_eq!(a.id, b.id);
    assert_eq!(b.id, c.id);
    assert_eq!(h.catalog_folders(&alice).await.len(), 1);
    assert!(h.dir("alice", "clips").is_dir());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_delete_and_rename_do_not_interleave() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();

    let (deleted, renamed) = tokio::join!(
        h.service.delete_folder(&alice, created.id),
        h.service.rename_folder(&alice, created.id, "archive"),
    );

    // Whichever runs second sees the other's finished result.
    match renamed {
        Ok(r) => assert_eq!(r.new_name, "archive"),
        Err(e) => assert_eq!(e.kind, ErrorKind::NotFound),
    }
    deleted.unwrap();
    assert!(!h.dir("alice", "clips").exists());
    assert!(!h.dir("alice", "archive").exists());
    assert!(h.catalog_folders(&alice).await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_listing_during_rename_keeps_single_row() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    let pause = h.executor.pause_after("mv ");

    let (renamed, listing) = tokio::join!(
        h.service.rename_folder(&alice, created.id, "archive"),
        async {
            pause.reached().await;
            let (listing, ()) = tokio::join!(h.service.list_folders(&alice), async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                pause.release();
            });
            listing
        },
    );

    let renamed = renamed.unwrap();
    assert_eq!(renamed.catalog, SecondaryOutcome::Applied { rows: 1 });
    let listing = listing.unwrap();
    assert_eq!(listing.folders.len(), 1);
    assert_eq!(listing.folders[0].name, "archive");
    assert_eq!(listing.folders[0].id, Some(created.id));

    let rows = h.catalog_folders(&alice).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, created.id);
    assert_eq!(rows[0].name, "archive");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_listing_during_delete_does_not_revive_folder() {
    let h = TestHarness::new();
    let alice = h.owner("alice");
    let created = h.service.create_folder(&alice, "clips").await.unwrap();
    let pause = h.executor.pause_before("rmdir ");

    let (deleted, listing) = tokio::join!(
        h.service.delete_folder(&alice, created.id),
        async {
            pause.reached().await;
            let (listing, ()) = tokio::join!(h.service.list_folders(&alice), async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                pause.release();
            });
            listing
        },
    );

    assert!(deleted.unwrap().remote_removed);
    let listing = listing.unwrap();
    assert!(listing.folders.iter().all(|f| f.name != "clips"));
    assert!(!h.dir("alice", "clips").exists());
    assert!(
        h.catalog_folders(&alice)
            .await
            .iter()
            .all(|f| f.id != created.id)
    );
}
