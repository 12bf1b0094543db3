//! PostgreSQL-backed membership store.
//!
//! Each unit of work wraps one sqlx transaction. Session rows fetched for
//! mutation are read with `FOR UPDATE`, so two units admitting members to
//! the same session run their read-increment-write one after the other.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::debug;

use together_core::error::{AppError, ErrorKind};
use together_core::result::AppResult;
use together_core::types::{InviteCode, MediaId, MemberId, SessionId};
use together_entity::media::Media;
use together_entity::member::Member;
use together_entity::membership::JoinRecord;
use together_entity::session::WatchSession;

use crate::repositories::{
    JoinRecordRepository, MediaRepository, MemberRepository, WatchSessionRepository,
};
use crate::store::{
    JoinRecordStore, MediaStore, MemberStore, MembershipStore, SessionStore, UnitOfWork,
};

/// Membership store over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgMembershipStore {
    pool: PgPool,
}

impl PgMembershipStore {
    /// Create a new store on the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for PgMembershipStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgUnitOfWork { tx: Some(tx) }))
    }
}

/// A unit of work bound to one PostgreSQL transaction.
///
/// Dropping the unit without committing rolls the transaction back.
pub struct PgUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgUnitOfWork {
    fn conn(&mut self) -> AppResult<&mut PgConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| AppError::internal("Unit of work already finished"))
    }
}

#[async_trait]
impl SessionStore for PgUnitOfWork {
    async fn session_by_id(&mut self, id: SessionId) -> AppResult<Option<WatchSession>> {
        WatchSessionRepository::find_by_id(self.conn()?, id).await
    }

    async fn lock_session_by_id(&mut self, id: SessionId) -> AppResult<Option<WatchSession>> {
        WatchSessionRepository::find_by_id_for_update(self.conn()?, id).await
    }

    async fn lock_session_by_code(&mut self, code: InviteCode) -> AppResult<Option<WatchSession>> {
        WatchSessionRepository::find_by_code_for_update(self.conn()?, code).await
    }

    async fn sessions_owned_by(&mut self, owner: MemberId) -> AppResult<Vec<WatchSession>> {
        WatchSessionRepository::find_by_owner(self.conn()?, owner).await
    }

    async fn insert_session(&mut self, session: &WatchSession) -> AppResult<()> {
        WatchSessionRepository::create(self.conn()?, session).await
    }

    async fn save_session(&mut self, session: &WatchSession) -> AppResult<()> {
        WatchSessionRepository::update_occupancy(self.conn()?, session).await
    }
}

#[async_trait]
impl MemberStore for PgUnitOfWork {
    async fn member_by_id(&mut self, id: MemberId) -> AppResult<Option<Member>> {
        MemberRepository::find_by_id(self.conn()?, id).await
    }

    async fn members_by_ids(&mut self, ids: &[MemberId]) -> AppResult<Vec<Member>> {
        MemberRepository::find_by_ids(self.conn()?, ids).await
    }
}

#[async_trait]
impl JoinRecordStore for PgUnitOfWork {
    async fn record_for(
        &mut self,
        member: MemberId,
        session: SessionId,
    ) -> AppResult<Option<JoinRecord>> {
        JoinRecordRepository::find_by_member_and_session(self.conn()?, member, session).await
    }

    async fn active_record_for(
        &mut self,
        member: MemberId,
        session: SessionId,
    ) -> AppResult<Option<JoinRecord>> {
        JoinRecordRepository::find_active_by_member_and_session(self.conn()?, member, session)
            .await
    }

    async fn active_records_by_member(&mut self, member: MemberId) -> AppResult<Vec<JoinRecord>> {
        JoinRecordRepository::find_active_by_member(self.conn()?, member).await
    }

    async fn active_records_by_session(
        &mut self,
        session: SessionId,
    ) -> AppResult<Vec<JoinRecord>> {
        JoinRecordRepository::find_active_by_session(self.conn()?, session).await
    }

    async fn insert_record(&mut self, record: &JoinRecord) -> AppResult<()> {
        JoinRecordRepository::create(self.conn()?, record).await
    }

    async fn update_record(&mut self, record: &JoinRecord) -> AppResult<()> {
        JoinRecordRepository::update_flags(self.conn()?, record).await
    }
}

#[async_trait]
impl MediaStore for PgUnitOfWork {
    async fn media_by_id(&mut self, id: MediaId) -> AppResult<Option<Media>> {
        MediaRepository::find_by_id(self.conn()?, id).await
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(&mut self) -> AppResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| AppError::internal("Unit of work already finished"))?;
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> AppResult<()> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
            })?;
            debug!("Transaction rolled back");
        }
        Ok(())
    }
}
