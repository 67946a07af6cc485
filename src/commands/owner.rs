//! Owner settings commands.

use clap::{Args, Subcommand};

use streamhub_core::AppError;
use streamhub_core::config::AppConfig;
use streamhub_core::types::RemoteTargetId;
use streamhub_entity::owner::OwnerSettings;
use streamhub_remote::TargetRegistry;

use crate::output::{self, OutputFormat};

/// Arguments for owner commands
#[derive(Debug, Args)]
pub struct OwnerArgs {
    /// Owner subcommand
    #[command(subcommand)]
    pub command: OwnerCommand,
}

/// Owner subcommands
#[derive(Debug, Subcommand)]
pub enum OwnerCommand {
    /// Show an owner's target and quota
    Show {
        /// Owner ID (UUID)
        #[arg(long = "owner")]
        owner_id: String,
    },
    /// Assign a target and/or quota to an owner
    Set {
        /// Owner ID (UUID)
        #[arg(long = "owner")]
        owner_id: String,
        /// Remote target ID
        #[arg(long)]
        target: Option<i64>,
        /// Quota in megabytes
        #[arg(long)]
        quota_mb: Option<i64>,
    },
}

/// Execute owner commands
pub async fn execute(
    args: &OwnerArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let catalog = super::create_catalog(config).await?;
    let targets = TargetRegistry::from_config(&config.remote)?;

    let settings = match &args.command {
        OwnerCommand::Show { owner_id } => {
            let owner_id = super::parse_owner_id(owner_id)?;
            catalog
                .find_owner_settings(owner_id)
                .await?
                .unwrap_or(OwnerSettings {
                    owner_id,
                    remote_target_id: None,
                    quota_mb: None,
                })
        }
        OwnerCommand::Set {
            owner_id,
            target,
            quota_mb,
        } => {
            let owner_id = super::parse_owner_id(owner_id)?;
            let remote_target_id = target.map(RemoteTargetId);
            if let Some(id) = remote_target_id {
                targets.get(id)?;
            }
            if quota_mb.is_some_and(|q| q < 0) {
                return Err(AppError::validation("Quota cannot be negative"));
            }
            let saved = catalog
                .save_owner_settings(&OwnerSettings {
                    owner_id,
                    remote_target_id,
                    quota_mb: *quota_mb,
                })
                .await?;
            output::print_success("Owner settings saved.");
            saved
        }
    };

    match format {
        OutputFormat::Json => output::print_json(&settings),
        OutputFormat::Table => {
            let target = targets.resolve(settings.remote_target_id)?;
            output::print_kv("owner", settings.owner_id);
            output::print_kv("target", format!("{} ({})", target.id, target.name));
            output::print_kv(
                "quota (MB)",
                settings.quota_mb.unwrap_or(config.quota.default_quota_mb as i64),
            );
        }
    }
    Ok(())
}
