//! CLI command definitions and dispatch.

pub mod folder;
pub mod migrate;
pub mod owner;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use streamhub_core::AppError;
use streamhub_core::config::AppConfig;
use streamhub_core::error::ErrorKind;
use streamhub_core::types::OwnerId;
use streamhub_database::{CatalogManager, FolderCatalog};
use streamhub_entity::owner::OwnerContext;
use streamhub_remote::{RemoteFolderGateway, TargetRegistry, build_executor};
use streamhub_service::FolderService;

use crate::output::OutputFormat;

/// StreamHub: logical folders on remote streaming hosts
#[derive(Debug, Parser)]
#[command(name = "streamhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded from config/<ENV>.toml
    #[arg(short, long, env = "STREAMHUB_ENV")]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending catalog migrations
    Migrate,
    /// Folder operations
    Folder(folder::FolderArgs),
    /// Owner target and quota assignments
    Owner(owner::OwnerArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate => migrate::execute(config).await,
            Commands::Folder(args) => folder::execute(args, config, self.format).await,
            Commands::Owner(args) => owner::execute(args, config, self.format).await,
        }
    }
}

/// Owner identity supplied on the command line.
#[derive(Debug, Clone, Args)]
pub struct OwnerIdentity {
    /// Owner ID (UUID)
    #[arg(long = "owner")]
    pub owner_id: String,
    /// Account username, used as the remote login
    #[arg(long)]
    pub username: Option<String>,
    /// Account email, used for the login when no username is given
    #[arg(long)]
    pub email: Option<String>,
}

impl OwnerIdentity {
    /// Parse into an owner context.
    pub fn context(&self) -> Result<OwnerContext, AppError> {
        Ok(OwnerContext::new(
            parse_owner_id(&self.owner_id)?,
            self.username.clone(),
            self.email.clone(),
        ))
    }
}

/// Parse an owner UUID argument.
pub fn parse_owner_id(raw: &str) -> Result<OwnerId, AppError> {
    Uuid::parse_str(raw)
        .map(OwnerId::from)
        .map_err(|e| AppError::validation(format!("Invalid owner UUID '{raw}': {e}")))
}

/// Helper: build the configured catalog
pub async fn create_catalog(config: &AppConfig) -> Result<Arc<dyn FolderCatalog>, AppError> {
    let manager = CatalogManager::new(&config.catalog, &config.database).await?;
    Ok(manager.catalog())
}

/// Helper: wire the folder service from configuration
pub async fn create_folder_service(config: &AppConfig) -> Result<FolderService, AppError> {
    let targets = TargetRegistry::from_config(&config.remote)?;
    let executor = build_executor(&config.remote)?;
    let gateway = RemoteFolderGateway::new(executor, config.remote.layout.clone());
    let catalog = create_catalog(config).await?;
    Ok(FolderService::new(catalog, gateway, targets, &config.quota))
}

/// Process exit code for an error.
pub fn exit_code(err: &AppError) -> i32 {
    match err.kind {
        ErrorKind::Validation => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::Conflict => 4,
        ErrorKind::RemoteExecution => 5,
        _ => 1,
    }
}
