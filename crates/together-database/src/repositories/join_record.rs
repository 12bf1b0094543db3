//! Join record repository implementation.

use sqlx::PgConnection;

use together_core::error::{AppError, ErrorKind};
use together_core::result::AppResult;
use together_core::types::{MemberId, SessionId};
use together_entity::membership::JoinRecord;

/// Repository for join record lookups and flag updates.
pub struct JoinRecordRepository;

impl JoinRecordRepository {
    /// Find the record of a (member, session) pair.
    pub async fn find_by_member_and_session(
        conn: &mut PgConnection,
        member_id: MemberId,
        session_id: SessionId,
    ) -> AppResult<Option<JoinRecord>> {
        sqlx::query_as::<_, JoinRecord>(
            "SELECT * FROM join_records WHERE member_id = $1 AND session_id = $2",
        )
        .bind(member_id)
        .bind(session_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find join record", e))
    }

    /// Find the record of a (member, session) pair if it is active.
    pub async fn find_active_by_member_and_session(
        conn: &mut PgConnection,
        member_id: MemberId,
        session_id: SessionId,
    ) -> AppResult<Option<JoinRecord>> {
        sqlx::query_as::<_, JoinRecord>(
            "SELECT * FROM join_records WHERE member_id = $1 AND session_id = $2 AND active = TRUE",
        )
        .bind(member_id)
        .bind(session_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active join record", e)
        })
    }

    /// List a member's active records.
    pub async fn find_active_by_member(
        conn: &mut PgConnection,
        member_id: MemberId,
    ) -> AppResult<Vec<JoinRecord>> {
        sqlx::query_as::<_, JoinRecord>(
            "SELECT * FROM join_records WHERE member_id = $1 AND active = TRUE \
             ORDER BY created_at, id",
        )
        .bind(member_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list member join records", e)
        })
    }

    /// List a session's active records.
    pub async fn find_active_by_session(
        conn: &mut PgConnection,
        session_id: SessionId,
    ) -> AppResult<Vec<JoinRecord>> {
        sqlx::query_as::<_, JoinRecord>(
            "SELECT * FROM join_records WHERE session_id = $1 AND active = TRUE \
             ORDER BY created_at, id",
        )
        .bind(session_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list session join records", e)
        })
    }

    /// Insert a new record.
    pub async fn create(conn: &mut PgConnection, record: &JoinRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO join_records (id, member_id, session_id, joined, active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(record.id)
        .bind(record.member_id)
        .bind(record.session_id)
        .bind(record.joined)
        .bind(record.active)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create join record", e))?;
        Ok(())
    }

    /// Persist the joined/active flags of an existing record.
    pub async fn update_flags(conn: &mut PgConnection, record: &JoinRecord) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE join_records SET joined = $2, active = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(record.id)
        .bind(record.joined)
        .bind(record.active)
        .bind(record.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update join record", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Join record {} not found", record.id)));
        }
        Ok(())
    }
}
