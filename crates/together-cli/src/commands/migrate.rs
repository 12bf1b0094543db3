//! Database migration commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use together_core::config::AppConfig;
use together_core::error::AppError;
use together_database::DatabasePool;
use together_database::migration::{self, MigrationEntry};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// List embedded migrations and whether each is applied
    Status,
}

#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    version: i64,
    description: String,
    applied: String,
}

impl From<&MigrationEntry> for MigrationRow {
    fn from(m: &MigrationEntry) -> Self {
        Self {
            version: m.version,
            description: m.description.clone(),
            applied: if m.applied { "✓" } else { "pending" }.to_string(),
        }
    }
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;

    let result = match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(db.pool())
                .await
                .map(|()| output::print_success("All migrations applied successfully."))
        }
        MigrateCommand::Status => migration::migration_status(db.pool())
            .await
            .and_then(|entries| {
                let rows: Vec<MigrationRow> = entries.iter().map(MigrationRow::from).collect();
                format.rows(&rows)
            })
            .map(|rendered| println!("{rendered}")),
    };
    db.close().await;
    result
}
