//! CLI command definitions and dispatch.

pub mod config;
pub mod member;
pub mod migrate;
pub mod session;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sqlx::PgPool;

use crate::output::OutputFormat;
use together_core::config::AppConfig;
use together_core::error::AppError;
use together_database::{DatabasePool, PgMembershipStore};
use together_service::{MembershipService, PublicUrlLocator};

/// Together: watch-together session administration
#[derive(Debug, Parser)]
#[command(name = "together", version, about, long_about = None)]
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
    /// Configuration inspection
    Config(config::ConfigArgs),
    /// Member management
    Member(member::MemberArgs),
    /// Watch session management
    Session(session::SessionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config, self.format).await,
            Commands::Config(args) => {
                config::execute(args, config, &self.config, self.format).await
            }
            Commands::Member(args) => member::execute(args, config, self.format).await,
            Commands::Session(args) => session::execute(args, config, self.format).await,
        }
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

/// Helper: build the membership service over a PostgreSQL pool
pub fn membership_service(config: &AppConfig, pool: PgPool) -> Result<MembershipService, AppError> {
    let locator = PublicUrlLocator::from_config(&config.media)?;
    Ok(MembershipService::new(
        Arc::new(PgMembershipStore::new(pool)),
        Arc::new(locator),
        config.membership.clone(),
    ))
}
