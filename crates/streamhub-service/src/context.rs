//! Per-operation owner scope.

use serde::Serialize;

use streamhub_core::traits::RemoteTarget;
use streamhub_entity::folder::FolderName;
use streamhub_entity::media::FolderSegment;
use streamhub_entity::owner::OwnerContext;

/// Everything an operation needs to know about the acting owner, resolved
/// once at the start of the operation and passed to every collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerScope {
    /// The owner as supplied by the caller.
    pub owner: OwnerContext,
    /// Directory name of the owner's root.
    pub login: String,
    /// Remote target the operation runs against.
    pub target: RemoteTarget,
    /// Quota used for percentage figures.
    pub quota_mb: u64,
}

impl OwnerScope {
    /// Absolute remote path of `name` for this owner.
    pub fn folder_path(&self, name: &FolderName) -> String {
        self.target.folder_path(&self.login, name.as_str())
    }

    /// Path-component segment identifying `name` inside media paths.
    pub fn segment(&self, name: &FolderName) -> FolderSegment {
        FolderSegment::new(self.login.clone(), name.as_str())
    }

    /// The same scope pointed at another target.
    pub fn on_target(&self, target: RemoteTarget) -> Self {
        Self {
            target,
            ..self.clone()
        }
    }
}
