//! Join record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use together_core::types::{JoinRecordId, MemberId, SessionId};

/// Durable link between one member and one session.
///
/// At most one record exists per (member, session) pair. Records are never
/// deleted: leaving clears `active`, rejoining sets it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct JoinRecord {
    /// Unique record identifier.
    pub id: JoinRecordId,
    /// The participating member.
    pub member_id: MemberId,
    /// The session joined.
    pub session_id: SessionId,
    /// Set once the member has joined at least once.
    pub joined: bool,
    /// Whether the member is currently present.
    pub active: bool,
    /// When the member first joined.
    pub created_at: DateTime<Utc>,
    /// When the record was last toggled.
    pub updated_at: DateTime<Utc>,
}

impl JoinRecord {
    /// Create the record for a first join.
    pub fn first_join(member_id: MemberId, session_id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id: JoinRecordId::new(),
            member_id,
            session_id,
            joined: true,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the member as departed.
    pub fn leave(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Mark a departed member as present again.
    pub fn come_back(&mut self) {
        self.active = true;
        self.joined = true;
        self.updated_at = Utc::now();
    }
}
