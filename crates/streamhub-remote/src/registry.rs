//! Registry of configured remote targets.

use std::collections::HashMap;
use std::sync::Arc;

use streamhub_core::AppError;
use streamhub_core::config::RemoteConfig;
use streamhub_core::result::AppResult;
use streamhub_core::traits::RemoteTarget;
use streamhub_core::types::RemoteTargetId;

/// Routes a [`RemoteTargetId`] to its connection details.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    targets: Arc<HashMap<RemoteTargetId, RemoteTarget>>,
    default_id: RemoteTargetId,
}

impl TargetRegistry {
    /// Build a registry from explicit targets.
    ///
    /// Fails when ids repeat or `default_id` is not among them.
    pub fn new(
        targets: impl IntoIterator<Item = RemoteTarget>,
        default_id: RemoteTargetId,
    ) -> AppResult<Self> {
        let mut map = HashMap::new();
        for target in targets {
            let id = target.id;
            if map.insert(id, target).is_some() {
                return Err(AppError::configuration(format!(
                    "Remote target {id} is configured more than once"
                )));
            }
        }
        if !map.contains_key(&default_id) {
            return Err(AppError::configuration(format!(
                "Default remote target {default_id} is not configured"
            )));
        }
        Ok(Self {
            targets: Arc::new(map),
            default_id,
        })
    }

    /// Build a registry from `[remote]` configuration.
    pub fn from_config(config: &RemoteConfig) -> AppResult<Self> {
        Self::new(
            config.targets.iter().map(RemoteTarget::from),
            RemoteTargetId(config.default_target),
        )
    }

    /// Look up a target. Unknown ids are a configuration error.
    pub fn get(&self, id: RemoteTargetId) -> AppResult<&RemoteTarget> {
        self.targets
            .get(&id)
            .ok_or_else(|| AppError::configuration(format!("Remote target {id} is not configured")))
    }

    /// Id used for owners without an assignment.
    pub fn default_id(&self) -> RemoteTargetId {
        self.default_id
    }

    /// Resolve an optional assignment, falling back to the default target.
    pub fn resolve(&self, assigned: Option<RemoteTargetId>) -> AppResult<&RemoteTarget> {
        self.get(assigned.unwrap_or(self.default_id))
    }

    /// All configured targets, ordered by id.
    pub fn list(&self) -> Vec<&RemoteTarget> {
        let mut targets: Vec<&RemoteTarget> = self.targets.values().collect();
        targets.sort_by_key(|t| t.id);
        targets
    }
}
