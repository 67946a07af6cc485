//! Shared test helpers for integration tests.
//!
//! The harness runs the real shell vocabulary against temporary
//! directories through the local executor, with an in-memory catalog.
//! Both collaborators can be switched into a failing state.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Notify;

use streamhub_core::AppError;
use streamhub_core::config::{LayoutConfig, QuotaConfig};
use streamhub_core::result::AppResult;
use streamhub_core::traits::{CommandOutput, RemoteExecutor, RemoteTarget};
use streamhub_core::types::{FolderId, OwnerId, RemoteTargetId};
use streamhub_database::{FolderCatalog, MemoryFolderCatalog};
use streamhub_entity::folder::{Folder, FolderName, NewFolder};
use streamhub_entity::media::{FolderSegment, MediaReference, NewMedia};
use streamhub_entity::owner::{OwnerContext, OwnerSettings};
use streamhub_remote::{LocalShellExecutor, RemoteFolderGateway, TargetRegistry};
use streamhub_service::FolderService;

pub const MIB: i64 = 1024 * 1024;

/// A point where the executor stops until the test lets it go.
#[derive(Debug, Clone, Default)]
pub struct Pause {
    reached: Arc<Notify>,
    release: Arc<Notify>,
}

impl Pause {
    /// Waits until the executor hits the pause.
    pub async fn reached(&self) {
        self.reached.notified().await;
    }

    /// Lets the paused script continue.
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn hold(&self) {
        self.reached.notify_one();
        self.release.notified().await;
    }
}

#[derive(Debug)]
struct ArmedPause {
    needle: String,
    after: bool,
    pause: Pause,
}

/// Local shell executor that can be switched off or paused around one
/// script.
#[derive(Debug)]
pub struct SwitchableExecutor {
    inner: LocalShellExecutor,
    down: AtomicBool,
    pause: Mutex<Option<ArmedPause>>,
}

impl SwitchableExecutor {
    pub fn new() -> Self {
        Self {
            inner: LocalShellExecutor::new(Duration::from_secs(10)),
            down: AtomicBool::new(false),
            pause: Mutex::new(None),
        }
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Pauses before running the next script containing `needle`.
    pub fn pause_before(&self, needle: &str) -> Pause {
        self.arm(needle, false)
    }

    /// Pauses after running the next script containing `needle`.
    pub fn pause_after(&self, needle: &str) -> Pause {
        self.arm(needle, true)
    }

    fn arm(&self, needle: &str, after: bool) -> Pause {
        let pause = Pause::default();
        *self.pause.lock().expect("pause slot") = Some(ArmedPause {
            needle: needle.to_string(),
            after,
            pause: pause.clone(),
        });
        pause
    }

    fn take_pause(&self, script: &str) -> Option<ArmedPause> {
        let mut slot = self.pause.lock().expect("pause slot");
        if slot.as_ref().is_some_and(|armed| script.contains(&armed.needle)) {
            slot.take()
        } else {
            None
        }
    }
}

#[async_trait]
impl RemoteExecutor for SwitchableExecutor {
    fn executor_type(&self) -> &str {
        "switchable"
    }

    async fn execute(&self, target: &RemoteTarget, script: &str) -> AppResult<CommandOutput> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::remote("ssh: connect to host: Connection refused"));
        }
        let armed = self.take_pause(script);
        if let Some(armed) = armed.as_ref().filter(|a| !a.after) {
            armed.pause.hold().await;
        }
        let output = self.inner.execute(target, script).await;
        if let Some(armed) = armed.as_ref().filter(|a| a.after) {
            armed.pause.hold().await;
        }
        output
    }
}

/// Memory catalog whose tables can be switched off.
///
/// Folder reads and folder writes fail independently, so a test can let an
/// operation resolve its folder and then lose the catalog for the write.
#[derive(Debug, Default)]
pub struct FlakyCatalog {
    inner: MemoryFolderCatalog,
    settings_down: AtomicBool,
    folder_reads_down: AtomicBool,
    folder_writes_down: AtomicBool,
    media_down: AtomicBool,
}

impl FlakyCatalog {
    pub fn set_settings_down(&self, down: bool) {
        self.settings_down.store(down, Ordering::SeqCst);
    }

    pub fn set_folder_reads_down(&self, down: bool) {
        self.folder_reads_down.store(down, Ordering::SeqCst);
    }

    pub fn set_folder_writes_down(&self, down: bool) {
        self.folder_writes_down.store(down, Ordering::SeqCst);
    }

    pub fn set_media_down(&self, down: bool) {
        self.media_down.store(down, Ordering::SeqCst);
    }

    fn check_settings(&self) -> AppResult<()> {
        if self.settings_down.load(Ordering::SeqCst) {
            return Err(AppError::database("owner settings table unavailable"));
        }
        Ok(())
    }

    fn check_folder_reads(&self) -> AppResult<()> {
        if self.folder_reads_down.load(Ordering::SeqCst) {
            return Err(AppError::database("folders table unavailable"));
        }
        Ok(())
    }

    fn check_folders(&self) -> AppResult<()> {
        if self.folder_writes_down.load(Ordering::SeqCst) {
            return Err(AppError::database("folders table unavailable"));
        }
        Ok(())
    }

    fn check_media(&self) -> AppResult<()> {
        if self.media_down.load(Ordering::SeqCst) {
            return Err(AppError::database("media table unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl FolderCatalog for FlakyCatalog {
    fn provider_name(&self) -> &str {
        "flaky"
    }

    async fn find_owner_settings(&self, owner_id: OwnerId) -> AppResult<Option<OwnerSettings>> {
        self.check_settings()?;
        self.inner.find_owner_settings(owner_id).await
    }

    async fn save_owner_settings(&self, settings: &OwnerSettings) -> AppResult<OwnerSettings> {
        self.inner.save_owner_settings(settings).await
    }

    async fn list_for_owner(&self, owner_id: OwnerId) -> AppResult<Vec<Folder>> {
        self.check_folder_reads()?;
        self.inner.list_for_owner(owner_id).await
    }

    async fn find_folder(&self, owner_id: OwnerId, id: FolderId) -> AppResult<Option<Folder>> {
        self.check_folder_reads()?;
        self.inner.find_folder(owner_id, id).await
    }

    async fn find_folder_by_name(
        &self,
        owner_id: OwnerId,
        target: RemoteTargetId,
        name: &FolderName,
    ) -> AppResult<Option<Folder>> {
        self.check_folder_reads()?;
        self.inner.find_folder_by_name(owner_id, target, name).await
    }

    async fn register_folder(&self, data: &NewFolder) -> AppResult<Folder> {
        self.check_folders()?;
        self.inner.register_folder(data).await
    }

    async fn rename_folder(
        &self,
        id: FolderId,
        name: &FolderName,
        display_name: &str,
        remote_path: &str,
    ) -> AppResult<Folder> {
        self.check_folders()?;
        self.inner
            .rename_folder(id, name, display_name, remote_path)
            .await
    }

    async fn mark_removed(&self, id: FolderId) -> AppResult<()> {
        self.check_folders()?;
        self.inner.mark_removed(id).await
    }

    async fn update_usage(&self, id: FolderId, space_used_mb: i64) -> AppResult<()> {
        self.check_folders()?;
        self.inner.update_usage(id, space_used_mb).await
    }

    async fn insert_media(&self, data: &NewMedia) -> AppResult<MediaReference> {
        self.inner.insert_media(data).await
    }

    async fn list_media(&self, owner_id: OwnerId) -> AppResult<Vec<MediaReference>> {
        self.inner.list_media(owner_id).await
    }

    async fn count_referencing_media(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<u64> {
        self.check_media()?;
        self.inner.count_referencing_media(owner_id, segment).await
    }

    async fn sum_media_bytes(&self, owner_id: OwnerId, segment: &FolderSegment) -> AppResult<u64> {
        self.check_media()?;
        self.inner.sum_media_bytes(owner_id, segment).await
    }

    async fn rewrite_media_paths(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
        new_folder: &FolderName,
    ) -> AppResult<u64> {
        self.check_media()?;
        self.inner
            .rewrite_media_paths(owner_id, segment, new_folder)
            .await
    }

    async fn delete_referencing_media(
        &self,
        owner_id: OwnerId,
        segment: &FolderSegment,
    ) -> AppResult<u64> {
        self.check_media()?;
        self.inner.delete_referencing_media(owner_id, segment).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        let down = [
            &self.settings_down,
            &self.folder_reads_down,
            &self.folder_writes_down,
            &self.media_down,
        ];
        Ok(down.iter().all(|flag| !flag.load(Ordering::SeqCst)))
    }
}

/// Folder service wired to temporary directories.
///
/// Target 1 (default) and target 2 each get their own base directory.
pub struct TestHarness {
    pub service: FolderService,
    pub catalog: Arc<FlakyCatalog>,
    pub executor: Arc<SwitchableExecutor>,
    primary: TempDir,
    secondary: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let primary = tempfile::tempdir().expect("tempdir");
        let secondary = tempfile::tempdir().expect("tempdir");

        let targets = TargetRegistry::new(
            [
                local_target(1, &primary),
                local_target(2, &secondary),
            ],
            RemoteTargetId(1),
        )
        .expect("valid targets");

        let executor = Arc::new(SwitchableExecutor::new());
        let gateway = RemoteFolderGateway::new(executor.clone(), LayoutConfig::default());
        let catalog = Arc::new(FlakyCatalog::default());
        let service = FolderService::new(
            catalog.clone(),
            gateway,
            targets,
            &QuotaConfig::default(),
        );

        Self {
            service,
            catalog,
            executor,
            primary,
            secondary,
        }
    }

    /// Owner context with a username login.
    pub fn owner(&self, login: &str) -> OwnerContext {
        OwnerContext::new(OwnerId::new(), Some(login.to_string()), None)
    }

    /// Local path of `<base>/<login>/<folder>` on target 1.
    pub fn dir(&self, login: &str, folder: &str) -> PathBuf {
        self.primary.path().join(login).join(folder)
    }

    /// Local path of `<base>/<login>/<folder>` on target 2.
    pub fn secondary_dir(&self, login: &str, folder: &str) -> PathBuf {
        self.secondary.path().join(login).join(folder)
    }

    /// Write a file of `len` bytes inside a folder on target 1.
    pub fn write_file(&self, login: &str, folder: &str, file: &str, len: usize) -> PathBuf {
        let path = self.dir(login, folder).join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, vec![7u8; len]).expect("write file");
        path
    }

    /// Record a media item under `<login>/<folder>/<file>`.
    pub async fn add_media(
        &self,
        owner: &OwnerContext,
        login: &str,
        folder: &str,
        file: &str,
        size_bytes: i64,
    ) -> MediaReference {
        self.catalog
            .insert_media(&NewMedia {
                owner_id: owner.owner_id,
                title: file.to_string(),
                url: format!("https://cdn.example/{login}/{folder}/{file}"),
                path: format!("/home/streaming/{login}/{folder}/{file}"),
                size_bytes,
            })
            .await
            .expect("insert media")
    }

    /// Assign an owner to a target and/or quota.
    pub async fn assign(&self, owner: &OwnerContext, target: Option<i64>, quota_mb: Option<i64>) {
        self.catalog
            .save_owner_settings(&OwnerSettings {
                owner_id: owner.owner_id,
                remote_target_id: target.map(RemoteTargetId),
                quota_mb,
            })
            .await
            .expect("save owner settings");
    }

    /// Active catalog folders of an owner.
    pub async fn catalog_folders(&self, owner: &OwnerContext) -> Vec<Folder> {
        self.catalog
            .list_for_owner(owner.owner_id)
            .await
            .expect("list catalog folders")
    }
}

fn local_target(id: i64, dir: &TempDir) -> RemoteTarget {
    RemoteTarget {
        id: RemoteTargetId(id),
        name: format!("local-{id}"),
        host: String::new(),
        port: 22,
        user: String::new(),
        base_path: dir.path().to_string_lossy().into_owned(),
    }
}
