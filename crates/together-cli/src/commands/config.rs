//! Configuration inspection commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use together_core::config::AppConfig;
use together_core::error::AppError;
use together_database::DatabasePool;
use together_database::connection::mask_password;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Check that the configured database is reachable
    Check,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.database.url = mask_password(&shown.database.url);

            match format {
                OutputFormat::Json => println!("{}", output::to_json(&shown)?),
                OutputFormat::Table => {
                    println!("Configuration '{}':", config_path);
                    output::print_kv("database.url", &shown.database.url);
                    output::print_kv(
                        "database.pool_size",
                        &shown.database.pool_size.to_string(),
                    );
                    output::print_kv(
                        "database.lock_timeout_ms",
                        &shown.database.lock_timeout_ms.to_string(),
                    );
                    output::print_kv("media.public_base_url", &shown.media.public_base_url);
                    output::print_kv(
                        "membership.enforce_capacity_on_rejoin",
                        &shown.membership.enforce_capacity_on_rejoin.to_string(),
                    );
                    output::print_kv("logging.level", &shown.logging.level);
                    output::print_kv("logging.format", &shown.logging.format);
                }
            }
        }
        ConfigCommand::Check => {
            let db = DatabasePool::connect(&config.database).await?;
            let healthy = db.health_check().await;
            db.close().await;

            if healthy? {
                output::print_success(&format!(
                    "Database {} is reachable",
                    mask_password(&config.database.url)
                ));
            } else {
                return Err(AppError::database("Database health check returned an unexpected value"));
            }
        }
    }

    Ok(())
}
