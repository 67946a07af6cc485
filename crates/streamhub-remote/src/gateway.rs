//! Typed folder operations on a remote target.
//!
//! The gateway runs one script per call and never retries. Scripts that
//! succeed but print something unparsable are reported as remote errors.

use std::sync::Arc;

use tracing::debug;

use streamhub_core::AppError;
use streamhub_core::config::LayoutConfig;
use streamhub_core::result::AppResult;
use streamhub_core::traits::{CommandOutput, RemoteExecutor, RemoteTarget};

use crate::commands;

/// Folder vocabulary over a [`RemoteExecutor`].
#[derive(Debug, Clone)]
pub struct RemoteFolderGateway {
    executor: Arc<dyn RemoteExecutor>,
    layout: LayoutConfig,
}

impl RemoteFolderGateway {
    /// Create a gateway using `layout` conventions.
    pub fn new(executor: Arc<dyn RemoteExecutor>, layout: LayoutConfig) -> Self {
        Self { executor, layout }
    }

    /// Directory layout in effect.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    async fn run(&self, target: &RemoteTarget, script: String) -> AppResult<CommandOutput> {
        debug!(
            target_id = %target.id,
            executor = self.executor.executor_type(),
            script = %script,
            "Executing remote script"
        );
        self.executor.execute(target, &script).await
    }

    /// Folder directory names under the owner's root, reserved names
    /// excluded, sorted. A missing root yields an empty list.
    pub async fn list_folders(&self, target: &RemoteTarget, login: &str) -> AppResult<Vec<String>> {
        let out = self
            .run(target, commands::list_dirs(&target.owner_root(login)))
            .await?;
        let mut names: Vec<String> = out
            .lines()
            .filter(|name| !self.layout.is_reserved(name))
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Create the owner's root and reserved subdirectories. Idempotent.
    pub async fn ensure_user_structure(&self, target: &RemoteTarget, login: &str) -> AppResult<()> {
        let script = commands::ensure_structure(
            &target.owner_root(login),
            &self.layout.reserved_dirs,
            &self.layout.dir_mode,
            self.layout.chown_spec(),
        );
        self.run(target, script).await?;
        Ok(())
    }

    /// Create one folder directory. Succeeds if it already exists.
    pub async fn create_folder(&self, target: &RemoteTarget, path: &str) -> AppResult<()> {
        let script = commands::create_dir(
            path,
            &self.layout.dir_mode,
            self.layout.chown_spec(),
        );
        self.run(target, script).await?;
        Ok(())
    }

    /// Whether a directory exists at `path`.
    pub async fn exists(&self, target: &RemoteTarget, path: &str) -> AppResult<bool> {
        let out = self.run(target, commands::exists(path)).await?;
        match out.lines().last() {
            Some(commands::EXISTS_MARKER) => Ok(true),
            Some(commands::MISSING_MARKER) => Ok(false),
            other => Err(AppError::remote(format!(
                "Unexpected output from existence check: {other:?}"
            ))),
        }
    }

    /// Recursive count of regular files under `path`.
    pub async fn file_count(&self, target: &RemoteTarget, path: &str) -> AppResult<u64> {
        let out = self.run(target, commands::file_count(path)).await?;
        parse_number(&out, "file count")
    }

    /// Recursive disk usage of `path` in bytes.
    pub async fn size_bytes(&self, target: &RemoteTarget, path: &str) -> AppResult<u64> {
        let out = self.run(target, commands::size_bytes(path)).await?;
        parse_number(&out, "disk usage")
    }

    /// Rename a directory. Fails when `to` already exists.
    pub async fn move_dir(&self, target: &RemoteTarget, from: &str, to: &str) -> AppResult<()> {
        self.run(target, commands::move_dir(from, to)).await?;
        Ok(())
    }

    /// Apply the configured mode and ownership recursively.
    pub async fn set_permissions(&self, target: &RemoteTarget, path: &str) -> AppResult<()> {
        let script = commands::set_permissions(
            path,
            &self.layout.dir_mode,
            self.layout.chown_spec(),
        );
        self.run(target, script).await?;
        Ok(())
    }

    /// Remove `path` if it is an empty directory; fails otherwise.
    pub async fn delete_empty(&self, target: &RemoteTarget, path: &str) -> AppResult<()> {
        self.run(target, commands::delete_empty(path)).await?;
        Ok(())
    }

    /// Delete transient and zero-length files under `path`. Returns how
    /// many were removed.
    pub async fn cleanup_transient(&self, target: &RemoteTarget, path: &str) -> AppResult<u64> {
        let out = self
            .run(
                target,
                commands::cleanup_transient(path, &self.layout.transient_patterns),
            )
            .await?;
        Ok(out.lines().count() as u64)
    }
}

fn parse_number(out: &CommandOutput, what: &str) -> AppResult<u64> {
    let line = out.lines().last().unwrap_or_default();
    line.parse::<u64>()
        .map_err(|_| AppError::remote(format!("Unexpected {what} output: '{line}'")))
}
