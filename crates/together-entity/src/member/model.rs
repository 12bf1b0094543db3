//! Member entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use together_core::types::MemberId;

/// A registered member. Profile data beyond the display name is owned by
/// the account system and not modelled here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    /// Unique member identifier.
    pub id: MemberId,
    /// Name shown to other members of a session.
    pub display_name: String,
    /// When the member was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMember {
    /// Display name.
    pub display_name: String,
}
