//! Response views returned by the membership service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use together_core::types::{InviteCode, MemberId, SessionId};
use together_entity::member::Member;
use together_entity::session::WatchSession;

/// Snapshot of a session returned by join and list operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session ID.
    pub session_id: SessionId,
    /// Owning member.
    pub owner_id: MemberId,
    /// Session title.
    pub title: String,
    /// Invite code.
    pub invite_code: InviteCode,
    /// Maximum number of members.
    pub capacity: i32,
    /// Currently active members.
    pub occupancy: i32,
    /// Seats still open to first-time joiners.
    pub available_seats: i32,
    /// Player URL of the attached media.
    pub media_url: Option<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl From<&WatchSession> for SessionInfo {
    fn from(session: &WatchSession) -> Self {
        Self {
            session_id: session.id,
            owner_id: session.owner_id,
            title: session.title.clone(),
            invite_code: session.invite_code(),
            capacity: session.capacity,
            occupancy: session.occupancy,
            available_seats: session.available_seats(),
            media_url: session.media_url.clone(),
            created_at: session.created_at,
        }
    }
}

/// Session snapshot enriched for a member who is entering the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedSessionInfo {
    /// The session itself.
    #[serde(flatten)]
    pub session: SessionInfo,
    /// The confirming member.
    pub member_id: MemberId,
    /// The confirming member's display name.
    pub member_name: String,
    /// Whether the confirming member owns the session.
    pub is_owner: bool,
    /// Public URL of the media to play.
    pub playback_url: String,
}

impl JoinedSessionInfo {
    /// Combine a session, the confirming member, and the resolved URL.
    pub fn new(session: &WatchSession, member: &Member, playback_url: String) -> Self {
        Self {
            session: SessionInfo::from(session),
            member_id: member.id,
            member_name: member.display_name.clone(),
            is_owner: session.is_owned_by(&member.id),
            playback_url,
        }
    }
}

/// An active member of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    /// Member ID.
    pub member_id: MemberId,
    /// Display name.
    pub display_name: String,
    /// Whether the member owns the session.
    pub is_owner: bool,
    /// When the member first joined.
    pub joined_at: DateTime<Utc>,
}

/// Outcome of recounting a session's occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Session ID.
    pub session_id: SessionId,
    /// Stored occupancy before the recount.
    pub previous: i32,
    /// Number of active join records.
    pub actual: i32,
}

impl Reconciliation {
    /// Whether the stored counter had drifted and was rewritten.
    pub fn corrected(&self) -> bool {
        self.previous != self.actual
    }
}
