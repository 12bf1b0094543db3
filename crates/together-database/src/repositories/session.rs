//! Watch session repository implementation.

use sqlx::PgConnection;

use together_core::error::{AppError, ErrorKind};
use together_core::result::AppResult;
use together_core::types::{InviteCode, MemberId, SessionId};
use together_entity::session::WatchSession;

/// Repository for watch session lookups and counter updates.
pub struct WatchSessionRepository;

impl WatchSessionRepository {
    /// Find a session by ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: SessionId,
    ) -> AppResult<Option<WatchSession>> {
        sqlx::query_as::<_, WatchSession>("SELECT * FROM watch_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Find a session by ID, holding a row lock until the transaction ends.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: SessionId,
    ) -> AppResult<Option<WatchSession>> {
        sqlx::query_as::<_, WatchSession>(
            "SELECT * FROM watch_sessions WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock session", e))
    }

    /// Find a session by invite code, holding a row lock until the
    /// transaction ends.
    pub async fn find_by_code_for_update(
        conn: &mut PgConnection,
        code: InviteCode,
    ) -> AppResult<Option<WatchSession>> {
        sqlx::query_as::<_, WatchSession>(
            "SELECT * FROM watch_sessions WHERE invite_code = $1 FOR UPDATE",
        )
        .bind(code.into_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find session by code", e)
        })
    }

    /// List sessions owned by a member.
    pub async fn find_by_owner(
        conn: &mut PgConnection,
        owner_id: MemberId,
    ) -> AppResult<Vec<WatchSession>> {
        sqlx::query_as::<_, WatchSession>(
            "SELECT * FROM watch_sessions WHERE owner_id = $1 ORDER BY created_at DESC, id",
        )
        .bind(owner_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list owned sessions", e))
    }

    /// Insert a new session.
    pub async fn create(conn: &mut PgConnection, session: &WatchSession) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO watch_sessions (id, owner_id, title, invite_code, capacity, occupancy, \
             media_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(session.id)
        .bind(session.owner_id)
        .bind(&session.title)
        .bind(session.invite_code)
        .bind(session.capacity)
        .bind(session.occupancy)
        .bind(&session.media_url)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))?;
        Ok(())
    }

    /// Persist the occupancy counter.
    pub async fn update_occupancy(conn: &mut PgConnection, session: &WatchSession) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE watch_sessions SET occupancy = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(session.id)
        .bind(session.occupancy)
        .bind(session.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update session occupancy", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Session {} not found", session.id)));
        }
        Ok(())
    }
}
