//! Folder CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use streamhub_core::AppError;
use streamhub_core::config::AppConfig;
use streamhub_core::types::FolderId;
use streamhub_service::{FolderSummary, SecondaryOutcome};

use super::OwnerIdentity;
use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Acting owner
    #[command(flatten)]
    pub owner: OwnerIdentity,

    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List the owner's folders from the remote store
    List,
    /// Create a folder
    Create {
        /// Folder name as entered
        name: String,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: String,
        /// New name as entered
        name: String,
    },
    /// Delete an empty folder
    Delete {
        /// Folder ID
        id: String,
    },
    /// Show catalog and remote usage of a folder
    Info {
        /// Folder ID
        id: String,
    },
    /// Clean up and normalize a folder's remote directory
    Sync {
        /// Folder ID
        id: String,
    },
}

/// Folder listing row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Display name
    display_name: String,
    /// Remote path
    path: String,
    /// Remote target
    target: i64,
    /// Synthesized default
    synthesized: bool,
}

impl From<&FolderSummary> for FolderRow {
    fn from(f: &FolderSummary) -> Self {
        Self {
            id: f.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            name: f.name.clone(),
            display_name: f.display_name.clone(),
            path: f.path.clone(),
            target: f.remote_target_id.0,
            synthesized: f.synthesized,
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let service = super::create_folder_service(config).await?;
    let owner = args.owner.context()?;

    match &args.command {
        FolderCommand::List => {
            let listing = service.list_folders(&owner).await?;
            if let Some(error) = &listing.error {
                output::print_warning(&format!("Remote listing unavailable: {error}"));
            }
            match format {
                OutputFormat::Json => output::print_json(&listing),
                OutputFormat::Table => {
                    let rows: Vec<FolderRow> = listing.folders.iter().map(FolderRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
        FolderCommand::Create { name } => {
            let created = service.create_folder(&owner, name).await?;
            match format {
                OutputFormat::Json => output::print_json(&created),
                OutputFormat::Table => {
                    output::print_success(&format!("Folder '{}' created.", created.name));
                    output::print_kv("id", created.id);
                    output::print_kv("original name", &created.original_name);
                    output::print_kv("sanitized", created.sanitized);
                    output::print_kv("path", &created.path);
                    output::print_kv("target", created.remote_target_id);
                    print_secondary("catalog", &created.catalog);
                }
            }
        }
        FolderCommand::Rename { id, name } => {
            let renamed = service
                .rename_folder(&owner, parse_folder_id(id)?, name)
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&renamed),
                OutputFormat::Table => {
                    output::print_success(&format!(
                        "Folder '{}' renamed to '{}'.",
                        renamed.old_name, renamed.new_name
                    ));
                    output::print_kv("sanitized", renamed.sanitized);
                    output::print_kv("path", &renamed.path);
                    output::print_kv("remote action", format!("{:?}", renamed.remote_action));
                    print_secondary("catalog", &renamed.catalog);
                    print_secondary("media rewrite", &renamed.media);
                }
            }
        }
        FolderCommand::Delete { id } => {
            let deleted = service.delete_folder(&owner, parse_folder_id(id)?).await?;
            match format {
                OutputFormat::Json => output::print_json(&deleted),
                OutputFormat::Table => {
                    output::print_success(&format!("Folder {} deleted.", deleted.id));
                    output::print_kv("path", &deleted.path);
                    output::print_kv("remote removed", deleted.remote_removed);
                    print_secondary("media purge", &deleted.media);
                    print_secondary("catalog", &deleted.catalog);
                }
            }
        }
        FolderCommand::Info { id } => {
            let info = service.folder_info(&owner, parse_folder_id(id)?).await?;
            match format {
                OutputFormat::Json => output::print_json(&info),
                OutputFormat::Table => {
                    output::print_kv("id", info.id);
                    output::print_kv("name", &info.name);
                    output::print_kv("path", &info.path);
                    output::print_kv("catalog media", info.catalog.media_count);
                    output::print_kv("remote exists", info.remote.exists);
                    output::print_kv("remote files", info.remote.file_count);
                    output::print_kv("remote bytes", info.remote.size_bytes);
                    output::print_kv("catalog MB", info.usage.catalog_mb);
                    output::print_kv("remote MB", info.usage.remote_mb);
                    output::print_kv("reported MB", info.usage.reported_mb);
                    output::print_kv(
                        "quota used",
                        format!("{}% of {} MB", info.usage.percent_of_quota, info.usage.quota_mb),
                    );
                    if info.usage.is_exceeded() {
                        output::print_warning("Quota reached for this owner.");
                    }
                    if let Some(error) = &info.catalog.error {
                        output::print_warning(&format!("Catalog unavailable: {error}"));
                    }
                    if let Some(error) = &info.remote.error {
                        output::print_warning(&format!("Remote unavailable: {error}"));
                    }
                }
            }
        }
        FolderCommand::Sync { id } => {
            let synced = service.sync_folder(&owner, parse_folder_id(id)?).await?;
            match format {
                OutputFormat::Json => output::print_json(&synced),
                OutputFormat::Table => {
                    output::print_success(&format!("Folder {} synchronized.", synced.id));
                    output::print_kv("path", &synced.path);
                    output::print_kv("transient removed", synced.transient_removed);
                    print_secondary("usage refresh", &synced.catalog);
                }
            }
        }
    }

    Ok(())
}

fn parse_folder_id(raw: &str) -> Result<FolderId, AppError> {
    Uuid::parse_str(raw)
        .map(FolderId::from)
        .map_err(|e| AppError::validation(format!("Invalid folder UUID '{raw}': {e}")))
}

fn print_secondary(label: &str, outcome: &SecondaryOutcome) {
    match outcome {
        SecondaryOutcome::Applied { rows } => output::print_kv(label, format!("applied ({rows} rows)")),
        SecondaryOutcome::Skipped => output::print_kv(label, "skipped"),
        SecondaryOutcome::Failed { error } => output::print_warning(&format!("{label} failed: {error}")),
    }
}
