//! Member repository implementation.

use sqlx::PgConnection;
use uuid::Uuid;

use together_core::error::{AppError, ErrorKind};
use together_core::result::AppResult;
use together_core::types::MemberId;
use together_entity::member::{CreateMember, Member};

/// Repository for member lookups.
pub struct MemberRepository;

impl MemberRepository {
    /// Find a member by ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: MemberId) -> AppResult<Option<Member>> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find member", e))
    }

    /// Find all members in the given ID set.
    pub async fn find_by_ids(conn: &mut PgConnection, ids: &[MemberId]) -> AppResult<Vec<Member>> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ANY($1) ORDER BY display_name")
            .bind(ids)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list members", e))
    }

    /// Create a new member.
    pub async fn create(conn: &mut PgConnection, data: &CreateMember) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(
            "INSERT INTO members (id, display_name) VALUES ($1, $2) RETURNING *",
        )
        .bind(MemberId::new())
        .bind(&data.display_name)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create member", e))
    }
}
