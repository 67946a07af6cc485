//! Remote host execution and directory layout configuration.

use serde::{Deserialize, Serialize};

/// Top-level remote configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Executor used to run commands: `"ssh"` or `"local"`.
    #[serde(default = "default_executor")]
    pub executor: String,
    /// Per-command timeout in seconds.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_seconds: u64,
    /// Target used for owners without an explicit assignment.
    #[serde(default = "default_target")]
    pub default_target: i64,
    /// Known remote targets.
    #[serde(default)]
    pub targets: Vec<RemoteTargetConfig>,
    /// Directory layout applied on every target.
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            executor: default_executor(),
            command_timeout_seconds: default_command_timeout(),
            default_target: default_target(),
            targets: Vec::new(),
            layout: LayoutConfig::default(),
        }
    }
}

/// One remote host/account that stores owner directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTargetConfig {
    /// Numeric target identifier referenced by owner settings.
    pub id: i64,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// SSH host name (ignored by the local executor).
    #[serde(default)]
    pub host: String,
    /// SSH port.
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    /// SSH user.
    #[serde(default = "default_ssh_user")]
    pub user: String,
    /// Directory under which every owner gets `<login>/`.
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

/// Directory layout conventions shared by all targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Owner subdirectories created with the owner tree and hidden from listings.
    #[serde(default = "default_reserved_dirs")]
    pub reserved_dirs: Vec<String>,
    /// Name of the folder synthesized when an owner has none.
    #[serde(default = "default_folder")]
    pub default_folder: String,
    /// Mode applied recursively on permission normalization.
    #[serde(default = "default_dir_mode")]
    pub dir_mode: String,
    /// `user:group` applied recursively, if set.
    #[serde(default)]
    pub ownership: Option<String>,
    /// Glob patterns of transient files removed during sync.
    #[serde(default = "default_transient_patterns")]
    pub transient_patterns: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reserved_dirs: default_reserved_dirs(),
            default_folder: default_folder(),
            dir_mode: default_dir_mode(),
            ownership: None,
            transient_patterns: default_transient_patterns(),
        }
    }
}

impl LayoutConfig {
    /// Whether `name` is one of the reserved owner subdirectories.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_dirs.iter().any(|r| r == name)
    }

    /// Ownership to apply, ignoring an empty setting.
    pub fn chown_spec(&self) -> Option<&str> {
        self.ownership.as_deref().filter(|o| !o.trim().is_empty())
    }
}

fn default_executor() -> String {
    "ssh".to_string()
}

fn default_command_timeout() -> u64 {
    30
}

fn default_target() -> i64 {
    1
}

fn default_ssh_port() -> u16 {
    22
}

fn default_ssh_user() -> String {
    "root".to_string()
}

fn default_base_path() -> String {
    "/home/streaming".to_string()
}

fn default_reserved_dirs() -> Vec<String> {
    vec!["recordings".to_string(), "logs".to_string()]
}

fn default_folder() -> String {
    "default".to_string()
}

fn default_dir_mode() -> String {
    "755".to_string()
}

fn default_transient_patterns() -> Vec<String> {
    vec!["*.tmp".to_string(), "*.part".to_string()]
}
