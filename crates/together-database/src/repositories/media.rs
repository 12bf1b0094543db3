//! Media repository implementation.

use sqlx::PgConnection;

use together_core::error::{AppError, ErrorKind};
use together_core::result::AppResult;
use together_core::types::MediaId;
use together_entity::media::Media;

/// Repository for media lookups.
pub struct MediaRepository;

impl MediaRepository {
    /// Find a media item by its numeric ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: MediaId) -> AppResult<Option<Media>> {
        sqlx::query_as::<_, Media>("SELECT * FROM media WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find media", e))
    }
}
