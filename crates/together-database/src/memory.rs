//! In-memory membership store using a Tokio mutex for single-node deployments.
//!
//! A unit of work holds the store lock from `begin` until it is committed,
//! rolled back, or dropped, and stages its writes on a private copy of the
//! state. Units therefore run one at a time and a failed unit leaves no
//! trace.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use together_core::error::AppError;
use together_core::result::AppResult;
use together_core::types::{InviteCode, MediaId, MemberId, SessionId};
use together_entity::media::Media;
use together_entity::member::Member;
use together_entity::membership::JoinRecord;
use together_entity::session::{CreateWatchSession, WatchSession};

use crate::store::{
    JoinRecordStore, MediaStore, MemberStore, MembershipStore, SessionStore, UnitOfWork,
};

/// Internal state for the memory-based store.
#[derive(Debug, Clone, Default)]
struct InnerState {
    /// Sessions by id.
    sessions: HashMap<SessionId, WatchSession>,
    /// Members by id.
    members: HashMap<MemberId, Member>,
    /// Join records keyed by their (member, session) pair.
    records: HashMap<(MemberId, SessionId), JoinRecord>,
    /// Media by numeric id.
    media: HashMap<i64, Media>,
}

/// In-memory membership store.
///
/// Suitable for single-node deployments and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryMembershipStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryMembershipStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member.
    pub async fn add_member(&self, display_name: &str) -> Member {
        let member = Member {
            id: MemberId::new(),
            display_name: display_name.to_string(),
            created_at: Utc::now(),
        };
        let mut state = self.state.lock().await;
        state.members.insert(member.id, member.clone());
        member
    }

    /// Register a session directly, bypassing the membership service.
    pub async fn add_session(&self, data: CreateWatchSession) -> WatchSession {
        let session = data.into_session();
        let mut state = self.state.lock().await;
        state.sessions.insert(session.id, session.clone());
        session
    }

    /// Register a media item.
    pub async fn add_media(&self, id: i64, saved_path: &str) -> Media {
        let media = Media {
            id,
            saved_path: saved_path.to_string(),
            created_at: Utc::now(),
        };
        let mut state = self.state.lock().await;
        state.media.insert(id, media.clone());
        media
    }

    /// Overwrite the stored occupancy of a session.
    pub async fn set_occupancy(&self, id: SessionId, occupancy: i32) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let session = state
            .sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Session {id} not found")))?;
        session.occupancy = occupancy;
        Ok(())
    }

    /// Current committed copy of a session.
    pub async fn session(&self, id: SessionId) -> Option<WatchSession> {
        self.state.lock().await.sessions.get(&id).cloned()
    }

    /// Current committed copy of a pair's join record.
    pub async fn record(&self, member: MemberId, session: SessionId) -> Option<JoinRecord> {
        self.state
            .lock()
            .await
            .records
            .get(&(member, session))
            .cloned()
    }

    /// Number of join records, active or not, that reference a session.
    pub async fn record_count(&self, session: SessionId) -> usize {
        self.state
            .lock()
            .await
            .records
            .keys()
            .filter(|(_, s)| *s == session)
            .count()
    }
}

#[async_trait]
impl MembershipStore for MemoryMembershipStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork {
            guard: Some(guard),
            staged,
        }))
    }
}

/// A unit of work over the in-memory state.
struct MemoryUnitOfWork {
    /// Lock on the committed state; `None` once the unit has finished.
    guard: Option<OwnedMutexGuard<InnerState>>,
    /// Working copy that receives this unit's writes.
    staged: InnerState,
}

impl MemoryUnitOfWork {
    fn ensure_open(&self) -> AppResult<()> {
        if self.guard.is_none() {
            return Err(AppError::internal("Unit of work already finished"));
        }
        Ok(())
    }

    fn sorted_records<F>(&self, filter: F) -> Vec<JoinRecord>
    where
        F: Fn(&JoinRecord) -> bool,
    {
        let mut records: Vec<JoinRecord> = self
            .staged
            .records
            .values()
            .filter(|r| filter(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        records
    }
}

#[async_trait]
impl SessionStore for MemoryUnitOfWork {
    async fn session_by_id(&mut self, id: SessionId) -> AppResult<Option<WatchSession>> {
        self.ensure_open()?;
        Ok(self.staged.sessions.get(&id).cloned())
    }

    async fn lock_session_by_id(&mut self, id: SessionId) -> AppResult<Option<WatchSession>> {
        // The whole store is already locked for this unit.
        self.session_by_id(id).await
    }

    async fn lock_session_by_code(&mut self, code: InviteCode) -> AppResult<Option<WatchSession>> {
        self.ensure_open()?;
        Ok(self
            .staged
            .sessions
            .values()
            .find(|s| s.invite_code == *code.as_uuid())
            .cloned())
    }

    async fn sessions_owned_by(&mut self, owner: MemberId) -> AppResult<Vec<WatchSession>> {
        self.ensure_open()?;
        let mut sessions: Vec<WatchSession> = self
            .staged
            .sessions
            .values()
            .filter(|s| s.owner_id == owner)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(sessions)
    }

    async fn insert_session(&mut self, session: &WatchSession) -> AppResult<()> {
        self.ensure_open()?;
        let code_taken = self
            .staged
            .sessions
            .values()
            .any(|s| s.invite_code == session.invite_code);
        if code_taken || self.staged.sessions.contains_key(&session.id) {
            return Err(AppError::database("Duplicate session id or invite code"));
        }
        self.staged.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn save_session(&mut self, session: &WatchSession) -> AppResult<()> {
        self.ensure_open()?;
        if session.occupancy < 0 {
            return Err(AppError::database("Session occupancy cannot be negative"));
        }
        let stored = self
            .staged
            .sessions
            .get_mut(&session.id)
            .ok_or_else(|| AppError::not_found(format!("Session {} not found", session.id)))?;
        stored.occupancy = session.occupancy;
        stored.updated_at = session.updated_at;
        Ok(())
    }
}

#[async_trait]
impl MemberStore for MemoryUnitOfWork {
    async fn member_by_id(&mut self, id: MemberId) -> AppResult<Option<Member>> {
        self.ensure_open()?;
        Ok(self.staged.members.get(&id).cloned())
    }

    async fn members_by_ids(&mut self, ids: &[MemberId]) -> AppResult<Vec<Member>> {
        self.ensure_open()?;
        let mut members: Vec<Member> = ids
            .iter()
            .filter_map(|id| self.staged.members.get(id).cloned())
            .collect();
        members.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        members.dedup_by_key(|m| m.id);
        Ok(members)
    }
}

#[async_trait]
impl JoinRecordStore for MemoryUnitOfWork {
    async fn record_for(
        &mut self,
        member: MemberId,
        session: SessionId,
    ) -> AppResult<Option<JoinRecord>> {
        self.ensure_open()?;
        Ok(self.staged.records.get(&(member, session)).cloned())
    }

    async fn active_record_for(
        &mut self,
        member: MemberId,
        session: SessionId,
    ) -> AppResult<Option<JoinRecord>> {
        Ok(self
            .record_for(member, session)
            .await?
            .filter(|r| r.active))
    }

    async fn active_records_by_member(&mut self, member: MemberId) -> AppResult<Vec<JoinRecord>> {
        self.ensure_open()?;
        Ok(self.sorted_records(|r| r.member_id == member && r.active))
    }

    async fn active_records_by_session(
        &mut self,
        session: SessionId,
    ) -> AppResult<Vec<JoinRecord>> {
        self.ensure_open()?;
        Ok(self.sorted_records(|r| r.session_id == session && r.active))
    }

    async fn insert_record(&mut self, record: &JoinRecord) -> AppResult<()> {
        self.ensure_open()?;
        let key = (record.member_id, record.session_id);
        if self.staged.records.contains_key(&key) {
            return Err(AppError::database(format!(
                "Join record for member {} in session {} already exists",
                record.member_id, record.session_id
            )));
        }
        self.staged.records.insert(key, record.clone());
        Ok(())
    }

    async fn update_record(&mut self, record: &JoinRecord) -> AppResult<()> {
        self.ensure_open()?;
        let stored = self
            .staged
            .records
            .get_mut(&(record.member_id, record.session_id))
            .filter(|r| r.id == record.id)
            .ok_or_else(|| AppError::not_found(format!("Join record {} not found", record.id)))?;
        stored.joined = record.joined;
        stored.active = record.active;
        stored.updated_at = record.updated_at;
        Ok(())
    }
}

#[async_trait]
impl MediaStore for MemoryUnitOfWork {
    async fn media_by_id(&mut self, id: MediaId) -> AppResult<Option<Media>> {
        self.ensure_open()?;
        Ok(self.staged.media.get(&id.get()).cloned())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(&mut self) -> AppResult<()> {
        let mut guard = self
            .guard
            .take()
            .ok_or_else(|| AppError::internal("Unit of work already finished"))?;
        *guard = std::mem::take(&mut self.staged);
        debug!("Memory unit committed");
        Ok(())
    }

    async fn rollback(&mut self) -> AppResult<()> {
        if self.guard.take().is_some() {
            self.staged = InnerState::default();
            debug!("Memory unit rolled back");
        }
        Ok(())
    }
}
