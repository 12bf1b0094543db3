//! Watch session management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use together_core::config::AppConfig;
use together_core::error::{AppError, ErrorKind};
use together_core::types::{MemberId, SessionId};
use together_database::repositories::WatchSessionRepository;
use together_service::{CreateSessionRequest, MemberSummary, RequestContext, SessionInfo};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Create a session
    Create {
        /// Owning member ID
        #[arg(long)]
        owner: MemberId,
        /// Session title
        #[arg(long)]
        title: String,
        /// Maximum number of members
        #[arg(long)]
        capacity: i32,
        /// Player URL of the media to watch
        #[arg(long)]
        media_url: Option<String>,
    },
    /// Show a session
    Show {
        /// Session ID
        id: SessionId,
    },
    /// List sessions owned by or joined by a member
    List {
        /// Member ID
        #[arg(long)]
        member: MemberId,
        /// List joined sessions instead of owned ones
        #[arg(long)]
        joined: bool,
    },
    /// List the active members of a session
    Members {
        /// Session ID
        id: SessionId,
    },
    /// Join a session on behalf of a member
    Join {
        /// Session ID
        #[arg(required_unless_present = "code", conflicts_with = "code")]
        id: Option<SessionId>,
        /// Invite code
        #[arg(long)]
        code: Option<String>,
        /// Member ID
        #[arg(long)]
        member: MemberId,
    },
    /// Confirm a member's entry and print the playback URL
    Confirm {
        /// Session ID
        id: SessionId,
        /// Member ID
        #[arg(long)]
        member: MemberId,
    },
    /// Remove a member from a session
    Leave {
        /// Session ID
        id: SessionId,
        /// Member ID
        #[arg(long)]
        member: MemberId,
    },
    /// Recount active members and repair the occupancy counter
    Reconcile {
        /// Session ID
        id: SessionId,
    },
}

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// Session ID
    id: String,
    /// Title
    title: String,
    /// Owner ID
    owner: String,
    /// Invite code
    code: String,
    /// Seats taken
    seats: String,
    /// Seats still open
    open: i32,
    /// Media URL
    media: String,
}

impl From<&SessionInfo> for SessionRow {
    fn from(s: &SessionInfo) -> Self {
        Self {
            id: s.session_id.to_string(),
            title: s.title.clone(),
            owner: s.owner_id.to_string(),
            code: s.invite_code.to_string(),
            seats: format!("{}/{}", s.occupancy, s.capacity),
            open: s.available_seats,
            media: s.media_url.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Member display row
#[derive(Debug, Serialize, Tabled)]
struct MemberRow {
    /// Member ID
    id: String,
    /// Display name
    name: String,
    /// Owner flag
    owner: String,
    /// Joined at
    joined_at: String,
}

impl From<&MemberSummary> for MemberRow {
    fn from(m: &MemberSummary) -> Self {
        Self {
            id: m.member_id.to_string(),
            name: m.display_name.clone(),
            owner: if m.is_owner { "✓" } else { "" }.to_string(),
            joined_at: m.joined_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let service = super::membership_service(config, pool.clone())?;

    match &args.command {
        SessionCommand::Create {
            owner,
            title,
            capacity,
            media_url,
        } => {
            let ctx = RequestContext::new(*owner);
            let info = service
                .create_session(
                    &ctx,
                    CreateSessionRequest {
                        title: title.clone(),
                        capacity: *capacity,
                        media_url: media_url.clone(),
                    },
                )
                .await?;
            println!("{}", format.row(&SessionRow::from(&info))?);
        }
        SessionCommand::Show { id } => {
            let mut conn = pool.acquire().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
            })?;
            let session = WatchSessionRepository::find_by_id(&mut conn, *id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Session {id} not found")))?;
            println!("{}", format.row(&SessionRow::from(&SessionInfo::from(&session)))?);
        }
        SessionCommand::List { member, joined } => {
            let ctx = RequestContext::new(*member);
            let sessions = if *joined {
                service.list_sessions_joined_by(&ctx).await?
            } else {
                service.list_sessions_owned_by(&ctx).await?
            };
            let rows: Vec<SessionRow> = sessions.iter().map(SessionRow::from).collect();
            println!("{}", format.rows(&rows)?);
        }
        SessionCommand::Members { id } => {
            let members = service.list_members(*id).await?;
            let rows: Vec<MemberRow> = members.iter().map(MemberRow::from).collect();
            println!("{}", format.rows(&rows)?);
        }
        SessionCommand::Join { id, code, member } => {
            let ctx = RequestContext::new(*member);
            let info = match (id, code) {
                (_, Some(code)) => service.join_by_code(&ctx, code).await?,
                (Some(id), None) => service.join_direct(&ctx, *id).await?,
                (None, None) => {
                    return Err(AppError::validation("Either a session ID or --code is required"));
                }
            };
            output::print_success(&format!(
                "Member {} is in session {} ({}/{})",
                member, info.session_id, info.occupancy, info.capacity
            ));
        }
        SessionCommand::Confirm { id, member } => {
            let ctx = RequestContext::new(*member);
            let joined = service.confirm_join(&ctx, *id).await?;
            match format {
                OutputFormat::Json => println!("{}", output::to_json(&joined)?),
                OutputFormat::Table => {
                    output::print_kv("session", &joined.session.session_id.to_string());
                    output::print_kv("member", &joined.member_name);
                    output::print_kv("owner", &joined.is_owner.to_string());
                    output::print_kv("playback_url", &joined.playback_url);
                }
            }
        }
        SessionCommand::Leave { id, member } => {
            let ctx = RequestContext::new(*member);
            service.leave(&ctx, *id).await?;
            output::print_success(&format!("Member {} left session {}", member, id));
        }
        SessionCommand::Reconcile { id } => {
            let outcome = service.reconcile_occupancy(*id).await?;
            if outcome.corrected() {
                output::print_warning(&format!(
                    "Occupancy of session {} corrected from {} to {}",
                    id, outcome.previous, outcome.actual
                ));
            } else {
                output::print_success(&format!(
                    "Occupancy of session {} is consistent ({})",
                    id, outcome.actual
                ));
            }
        }
    }

    Ok(())
}
