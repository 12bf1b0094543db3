//! Fixtures for running the membership service against PostgreSQL.
//!
//! Set `TOGETHER_TEST_DATABASE_URL` (or `DATABASE_URL`) to a scratch
//! database. Without it the PostgreSQL tests return early. Every test
//! creates its own members and sessions, so tests share the schema
//! without cleaning it.

use std::sync::Arc;

use sqlx::PgPool;

use together_core::config::{DatabaseConfig, MembershipConfig};
use together_core::types::{MemberId, SessionId};
use together_database::repositories::{
    JoinRecordRepository, MemberRepository, WatchSessionRepository,
};
use together_database::{DatabasePool, PgMembershipStore};
use together_entity::member::{CreateMember, Member};
use together_entity::membership::JoinRecord;
use together_entity::session::WatchSession;
use together_service::{CreateSessionRequest, MembershipService, PublicUrlLocator, RequestContext};

use super::MEDIA_BASE;

/// Service over a migrated PostgreSQL pool.
pub struct PgTestApp {
    pub pool: PgPool,
    pub service: MembershipService,
}

impl PgTestApp {
    /// Connect and migrate, or `None` when no test database is configured.
    pub async fn connect() -> Option<Self> {
        let Some(url) = std::env::var("TOGETHER_TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .ok()
        else {
            eprintln!("TOGETHER_TEST_DATABASE_URL not set; skipping PostgreSQL test");
            return None;
        };

        let config = DatabaseConfig {
            url,
            pool_size: 12,
            min_idle: 1,
            acquire_timeout_seconds: 10,
            lock_timeout_ms: 10_000,
        };
        let db = DatabasePool::connect(&config)
            .await
            .expect("Failed to connect to test database");
        together_database::migration::run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let pool = db.into_pool();
        let locator = PublicUrlLocator::new(MEDIA_BASE).expect("locator");
        let service = MembershipService::new(
            Arc::new(PgMembershipStore::new(pool.clone())),
            Arc::new(locator),
            MembershipConfig::default(),
        );
        Some(Self { pool, service })
    }

    pub async fn member(&self, name: &str) -> (Member, RequestContext) {
        let mut conn = self.pool.acquire().await.expect("connection");
        let member = MemberRepository::create(
            &mut conn,
            &CreateMember {
                display_name: name.to_string(),
            },
        )
        .await
        .expect("member created");
        let ctx = RequestContext::new(member.id);
        (member, ctx)
    }

    pub async fn session(&self, owner: &RequestContext, capacity: i32) -> SessionId {
        self.service
            .create_session(
                owner,
                CreateSessionRequest {
                    title: "Movie night".to_string(),
                    capacity,
                    media_url: None,
                },
            )
            .await
            .expect("session created")
            .session_id
    }

    /// Committed session row.
    pub async fn stored_session(&self, id: SessionId) -> WatchSession {
        let mut conn = self.pool.acquire().await.expect("connection");
        WatchSessionRepository::find_by_id(&mut conn, id)
            .await
            .expect("query")
            .expect("session exists")
    }

    pub async fn occupancy(&self, id: SessionId) -> i32 {
        self.stored_session(id).await.occupancy
    }

    pub async fn record(&self, member: MemberId, session: SessionId) -> Option<JoinRecord> {
        let mut conn = self.pool.acquire().await.expect("connection");
        JoinRecordRepository::find_by_member_and_session(&mut conn, member, session)
            .await
            .expect("query")
    }

    /// Rows in `join_records` for a session, active or not.
    pub async fn record_count(&self, session: SessionId) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM join_records WHERE session_id = $1")
            .bind(session)
            .fetch_one(&self.pool)
            .await
            .expect("count")
    }
}
