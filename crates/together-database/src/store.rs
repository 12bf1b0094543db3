//! Store traits consumed by the membership service.
//!
//! Every public membership operation runs inside one [`UnitOfWork`]
//! opened by [`MembershipStore::begin`]. Reads and writes go through the
//! unit; nothing is visible to other units until [`UnitOfWork::commit`].

use async_trait::async_trait;

use together_core::result::AppResult;
use together_core::types::{InviteCode, MediaId, MemberId, SessionId};
use together_entity::media::Media;
use together_entity::member::Member;
use together_entity::membership::JoinRecord;
use together_entity::session::WatchSession;

/// Session lookups and persistence.
#[async_trait]
pub trait SessionStore: Send {
    /// Find a session by id without locking it.
    async fn session_by_id(&mut self, id: SessionId) -> AppResult<Option<WatchSession>>;

    /// Find a session by id and lock it until the unit ends, so that
    /// concurrent occupancy updates on the same session serialize.
    async fn lock_session_by_id(&mut self, id: SessionId) -> AppResult<Option<WatchSession>>;

    /// Find a session by invite code and lock it until the unit ends.
    async fn lock_session_by_code(&mut self, code: InviteCode) -> AppResult<Option<WatchSession>>;

    /// List sessions owned by a member, newest first.
    async fn sessions_owned_by(&mut self, owner: MemberId) -> AppResult<Vec<WatchSession>>;

    /// Insert a new session.
    async fn insert_session(&mut self, session: &WatchSession) -> AppResult<()>;

    /// Persist a session's occupancy counter.
    async fn save_session(&mut self, session: &WatchSession) -> AppResult<()>;
}

/// Member lookups.
#[async_trait]
pub trait MemberStore: Send {
    /// Find a member by id.
    async fn member_by_id(&mut self, id: MemberId) -> AppResult<Option<Member>>;

    /// Find all members with the given ids. Unknown ids are skipped.
    async fn members_by_ids(&mut self, ids: &[MemberId]) -> AppResult<Vec<Member>>;
}

/// Join record lookups and persistence.
#[async_trait]
pub trait JoinRecordStore: Send {
    /// Find the record for a (member, session) pair regardless of state.
    async fn record_for(
        &mut self,
        member: MemberId,
        session: SessionId,
    ) -> AppResult<Option<JoinRecord>>;

    /// Find the record for a pair only if it is active.
    async fn active_record_for(
        &mut self,
        member: MemberId,
        session: SessionId,
    ) -> AppResult<Option<JoinRecord>>;

    /// List a member's active records, oldest first.
    async fn active_records_by_member(&mut self, member: MemberId) -> AppResult<Vec<JoinRecord>>;

    /// List a session's active records, oldest first.
    async fn active_records_by_session(
        &mut self,
        session: SessionId,
    ) -> AppResult<Vec<JoinRecord>>;

    /// Insert a new record. Fails if the pair already has one.
    async fn insert_record(&mut self, record: &JoinRecord) -> AppResult<()>;

    /// Persist a record's flags.
    async fn update_record(&mut self, record: &JoinRecord) -> AppResult<()>;
}

/// Media lookups.
#[async_trait]
pub trait MediaStore: Send {
    /// Find a media item by its numeric id.
    async fn media_by_id(&mut self, id: MediaId) -> AppResult<Option<Media>>;
}

/// One transaction scope over all membership stores.
///
/// Dropping a unit without committing discards its writes.
#[async_trait]
pub trait UnitOfWork: SessionStore + MemberStore + JoinRecordStore + MediaStore {
    /// Make all writes of this unit durable and visible.
    async fn commit(&mut self) -> AppResult<()>;

    /// Discard all writes of this unit.
    async fn rollback(&mut self) -> AppResult<()>;
}

/// Factory for units of work.
#[async_trait]
pub trait MembershipStore: Send + Sync + std::fmt::Debug + 'static {
    /// Open a new unit of work.
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}
