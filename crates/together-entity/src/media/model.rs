//! Media entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A playable media item (encoded video) referenced by sessions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Media {
    /// Numeric media identifier, as embedded in player URLs.
    pub id: i64,
    /// Object key of the playable asset within the media bucket.
    pub saved_path: String,
    /// When the media item was registered.
    pub created_at: DateTime<Utc>,
}
