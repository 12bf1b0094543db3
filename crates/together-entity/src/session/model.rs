//! Watch session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use together_core::types::{InviteCode, MemberId, SessionId};

/// A shared viewing session.
///
/// `occupancy` counts members with an active join record and is only
/// changed through [`WatchSession::admit`] and [`WatchSession::release`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WatchSession {
    /// Unique session identifier.
    pub id: SessionId,
    /// The member who created and owns the session.
    pub owner_id: MemberId,
    /// Session title.
    pub title: String,
    /// Invite code accepted by join-by-code.
    pub invite_code: Uuid,
    /// Maximum number of simultaneously active members.
    pub capacity: i32,
    /// Number of currently active members.
    pub occupancy: i32,
    /// Player URL of the attached media (`.../video-player/<id>`).
    pub media_url: Option<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session was last updated.
    pub updated_at: DateTime<Utc>,
}

impl WatchSession {
    /// The session's invite code.
    pub fn invite_code(&self) -> InviteCode {
        InviteCode::from_uuid(self.invite_code)
    }

    /// Whether another member can be admitted without exceeding capacity.
    pub fn has_room(&self) -> bool {
        self.capacity > self.occupancy
    }

    /// Remaining seats, never negative.
    pub fn available_seats(&self) -> i32 {
        (self.capacity - self.occupancy).max(0)
    }

    /// Whether the given member owns this session.
    pub fn is_owned_by(&self, member_id: &MemberId) -> bool {
        self.owner_id == *member_id
    }

    /// Count one more active member.
    pub fn admit(&mut self) {
        self.occupancy += 1;
        self.updated_at = Utc::now();
    }

    /// Count one fewer active member. Occupancy never drops below zero.
    pub fn release(&mut self) {
        self.occupancy = (self.occupancy - 1).max(0);
        self.updated_at = Utc::now();
    }

    /// Overwrite occupancy with a recounted number of active members.
    pub fn reset_occupancy(&mut self, active_members: i32) {
        self.occupancy = active_members.max(0);
        self.updated_at = Utc::now();
    }
}

/// Data required to create a new watch session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWatchSession {
    /// Owning member.
    pub owner_id: MemberId,
    /// Session title.
    pub title: String,
    /// Maximum number of members.
    pub capacity: i32,
    /// Player URL of the attached media.
    pub media_url: Option<String>,
}

impl CreateWatchSession {
    /// Build the session row with a fresh id and invite code and zero
    /// occupancy.
    pub fn into_session(self) -> WatchSession {
        let now = Utc::now();
        WatchSession {
            id: SessionId::new(),
            owner_id: self.owner_id,
            title: self.title,
            invite_code: InviteCode::generate().into_uuid(),
            capacity: self.capacity,
            occupancy: 0,
            media_url: self.media_url,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(capacity: i32, occupancy: i32) -> WatchSession {
        let mut session = CreateWatchSession {
            owner_id: MemberId::new(),
            title: "Friday movie".to_string(),
            capacity,
            media_url: None,
        }
        .into_session();
        session.occupancy = occupancy;
        session
    }

    #[test]
    fn test_has_room() {
        assert!(session(2, 1).has_room());
        assert!(!session(2, 2).has_room());
        assert!(!session(0, 0).has_room());
    }

    #[test]
    fn test_admit_and_release() {
        let mut s = session(2, 0);
        s.admit();
        assert_eq!(s.occupancy, 1);
        assert_eq!(s.available_seats(), 1);
        s.release();
        assert_eq!(s.occupancy, 0);
    }

    #[test]
    fn test_release_never_goes_negative() {
        let mut s = session(2, 0);
        s.release();
        assert_eq!(s.occupancy, 0);
    }

    #[test]
    fn test_new_session_starts_empty_with_invite_code() {
        let a = session(4, 0);
        let b = session(4, 0);
        assert_eq!(a.occupancy, 0);
        assert_ne!(a.invite_code, b.invite_code);
        assert!(a.is_owned_by(&a.owner_id));
        assert!(!a.is_owned_by(&b.owner_id));
    }
}
