//! CLI command definitions and dispatch.

pub mod migrate;
pub mod version;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use docvault_core::error::AppError;
use docvault_service::VersionService;

/// DocVault — Document Version & Change-Impact Engine
#[derive(Debug, Parser)]
#[command(name = "docvault", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

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
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Version management
    Version(version::VersionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Version(args) => version::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub async fn load_config(config_path: &str) -> Result<docvault_core::config::AppConfig, AppError> {
    docvault_core::config::AppConfig::load(config_path)
        .map_err(|e| AppError::internal(format!("Failed to load config: {}", e)))
}

/// Helper: create database pool from config
pub async fn create_db_pool(
    config: &docvault_core::config::AppConfig,
) -> Result<sqlx::PgPool, AppError> {
    let pool = docvault_database::connection::DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

/// Helper: build the version service on top of the Postgres store
pub async fn create_version_service(
    config: &docvault_core::config::AppConfig,
) -> Result<VersionService, AppError> {
    let pool = create_db_pool(config).await?;
    let store = Arc::new(docvault_database::repositories::VersionRepository::new(
        pool,
    ));
    Ok(VersionService::new(store, &config.versioning))
}
