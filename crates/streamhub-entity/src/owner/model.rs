//! Owner context and settings.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use streamhub_core::AppError;
use streamhub_core::result::AppResult;
use streamhub_core::types::{OwnerId, RemoteTargetId};

/// The authenticated owner on whose behalf an operation runs.
///
/// Resolved by the caller's authentication layer and passed into every
/// service method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerContext {
    /// The owner's ID.
    pub owner_id: OwnerId,
    /// Account username, if any.
    pub username: Option<String>,
    /// Account email, if any.
    pub email: Option<String>,
}

impl OwnerContext {
    /// Creates a new owner context.
    pub fn new(owner_id: OwnerId, username: Option<String>, email: Option<String>) -> Self {
        Self {
            owner_id,
            username,
            email,
        }
    }

    /// Directory name of the owner's root on the remote target.
    ///
    /// Username, else the email local part, else `user_<id>`. The result
    /// becomes a path component, so anything that is not a plain
    /// `[A-Za-z0-9._-]` token is rejected.
    pub fn login(&self) -> AppResult<String> {
        let candidate = self
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("user_{}", self.owner_id.as_uuid().simple()));

        let valid = candidate != "."
            && candidate != ".."
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(AppError::validation(format!(
                "Owner login '{candidate}' cannot be used as a directory name"
            )));
        }
        Ok(candidate)
    }
}

/// Per-owner catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OwnerSettings {
    /// The owner.
    pub owner_id: OwnerId,
    /// Assigned remote target, if any.
    pub remote_target_id: Option<RemoteTargetId>,
    /// Quota override in megabytes, if any.
    pub quota_mb: Option<i64>,
}
