//! Member management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use together_core::config::AppConfig;
use together_core::error::{AppError, ErrorKind};
use together_core::types::MemberId;
use together_database::repositories::MemberRepository;
use together_entity::member::{CreateMember, Member};

/// Arguments for member commands
#[derive(Debug, Args)]
pub struct MemberArgs {
    /// Member subcommand
    #[command(subcommand)]
    pub command: MemberCommand,
}

/// Member subcommands
#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    /// Register a member
    Create {
        /// Display name
        display_name: String,
    },
    /// Show a member
    Show {
        /// Member ID
        id: MemberId,
    },
}

/// Member display row
#[derive(Debug, Serialize, Tabled)]
struct MemberRow {
    /// Member ID
    id: String,
    /// Display name
    display_name: String,
    /// Created at
    created_at: String,
}

impl From<&Member> for MemberRow {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id.to_string(),
            display_name: m.display_name.clone(),
            created_at: m.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute member commands
pub async fn execute(
    args: &MemberArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let mut conn = pool.acquire().await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
    })?;

    match &args.command {
        MemberCommand::Create { display_name } => {
            let name = display_name.trim();
            if name.is_empty() {
                return Err(AppError::validation("Display name must not be empty"));
            }
            let member = MemberRepository::create(
                &mut conn,
                &CreateMember {
                    display_name: name.to_string(),
                },
            )
            .await?;
            println!("{}", format.row(&MemberRow::from(&member))?);
        }
        MemberCommand::Show { id } => {
            let member = MemberRepository::find_by_id(&mut conn, *id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Member {id} not found")))?;
            println!("{}", format.row(&MemberRow::from(&member))?);
        }
    }

    Ok(())
}
