//! Membership service that admits members to watch sessions and tracks who is present.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use together_core::config::MembershipConfig;
use together_core::error::AppError;
use together_core::result::AppResult;
use together_core::traits::{MediaLocator, Service};
use together_core::types::{InviteCode, MemberId, SessionId};
use together_database::store::{MembershipStore, UnitOfWork};
use together_entity::member::Member;
use together_entity::membership::{JoinRecord, MembershipState};
use together_entity::session::{CreateWatchSession, WatchSession};

use super::info::{JoinedSessionInfo, MemberSummary, Reconciliation, SessionInfo};
use super::player_url;
use crate::context::RequestContext;

/// Maximum title length in characters.
const MAX_TITLE_LENGTH: usize = 100;

/// Request to create a new watch session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Session title.
    pub title: String,
    /// Maximum number of members.
    pub capacity: i32,
    /// Player URL of the media to watch.
    pub media_url: Option<String>,
}

/// Manages membership of watch sessions.
///
/// Every public operation runs in its own unit of work, committed on
/// success and rolled back on any error.
#[derive(Debug, Clone)]
pub struct MembershipService {
    /// Transactional store for sessions, members, join records, and media.
    store: Arc<dyn MembershipStore>,
    /// Resolves media storage paths to playback URLs.
    locator: Arc<dyn MediaLocator>,
    /// Membership rules.
    config: MembershipConfig,
}

impl Service for MembershipService {}

impl MembershipService {
    /// Creates a new membership service.
    pub fn new(
        store: Arc<dyn MembershipStore>,
        locator: Arc<dyn MediaLocator>,
        config: MembershipConfig,
    ) -> Self {
        Self {
            store,
            locator,
            config,
        }
    }

    /// Joins the requester to a session by id.
    ///
    /// Rejoins if the requester had left, returns the current snapshot if
    /// already present, and otherwise admits through the capacity guard.
    pub async fn join_direct(
        &self,
        ctx: &RequestContext,
        session_id: SessionId,
    ) -> AppResult<SessionInfo> {
        let mut uow = self.store.begin().await?;
        let result = self.join_direct_in(uow.as_mut(), ctx.member_id, session_id).await;
        finish(uow, result).await
    }

    /// Joins the requester to the session matching an invite code.
    pub async fn join_by_code(&self, ctx: &RequestContext, code: &str) -> AppResult<SessionInfo> {
        let code = InviteCode::parse(code)?;
        let mut uow = self.store.begin().await?;
        let result = self.join_by_code_in(uow.as_mut(), ctx.member_id, code).await;
        finish(uow, result).await
    }

    /// Confirms an active member's entry and resolves the playback URL.
    pub async fn confirm_join(
        &self,
        ctx: &RequestContext,
        session_id: SessionId,
    ) -> AppResult<JoinedSessionInfo> {
        let mut uow = self.store.begin().await?;
        let result = self.confirm_join_in(uow.as_mut(), ctx.member_id, session_id).await;
        finish(uow, result).await
    }

    /// Removes the requester from a session. Leaving twice is a no-op.
    pub async fn leave(&self, ctx: &RequestContext, session_id: SessionId) -> AppResult<()> {
        let mut uow = self.store.begin().await?;
        let result = self.leave_in(uow.as_mut(), ctx.member_id, session_id).await;
        finish(uow, result).await
    }

    /// Lists sessions in which the requester is currently active.
    pub async fn list_sessions_joined_by(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<Vec<SessionInfo>> {
        let mut uow = self.store.begin().await?;
        let result = self.joined_by_in(uow.as_mut(), ctx.member_id).await;
        finish(uow, result).await
    }

    /// Lists sessions owned by the requester.
    pub async fn list_sessions_owned_by(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<Vec<SessionInfo>> {
        let mut uow = self.store.begin().await?;
        let result = self.owned_by_in(uow.as_mut(), ctx.member_id).await;
        finish(uow, result).await
    }

    /// Creates a session owned by the requester with a fresh invite code.
    ///
    /// The owner is not joined automatically.
    pub async fn create_session(
        &self,
        ctx: &RequestContext,
        req: CreateSessionRequest,
    ) -> AppResult<SessionInfo> {
        let title = req.title.trim().to_string();
        if title.is_empty() || title.chars().count() > MAX_TITLE_LENGTH {
            return Err(AppError::validation(format!(
                "Title must be between 1 and {MAX_TITLE_LENGTH} characters"
            )));
        }
        if req.capacity < 1 {
            return Err(AppError::validation("Capacity must be at least 1"));
        }

        let data = CreateWatchSession {
            owner_id: ctx.member_id,
            title,
            capacity: req.capacity,
            media_url: req.media_url,
        };

        let mut uow = self.store.begin().await?;
        let result = self.create_session_in(uow.as_mut(), data).await;
        finish(uow, result).await
    }

    /// Reports where the requester stands with respect to a session.
    pub async fn membership_state(
        &self,
        ctx: &RequestContext,
        session_id: SessionId,
    ) -> AppResult<MembershipState> {
        let mut uow = self.store.begin().await?;
        let result = self.state_in(uow.as_mut(), ctx.member_id, session_id).await;
        finish(uow, result).await
    }

    /// Lists the active members of a session.
    pub async fn list_members(&self, session_id: SessionId) -> AppResult<Vec<MemberSummary>> {
        let mut uow = self.store.begin().await?;
        let result = self.members_in(uow.as_mut(), session_id).await;
        finish(uow, result).await
    }

    /// Recounts a session's active records and repairs a drifted
    /// occupancy counter.
    pub async fn reconcile_occupancy(&self, session_id: SessionId) -> AppResult<Reconciliation> {
        let mut uow = self.store.begin().await?;
        let result = self.reconcile_in(uow.as_mut(), session_id).await;
        finish(uow, result).await
    }

    // ── Unit bodies ──────────────────────────────────────────────

    async fn join_direct_in(
        &self,
        uow: &mut dyn UnitOfWork,
        member_id: MemberId,
        session_id: SessionId,
    ) -> AppResult<SessionInfo> {
        let session = uow
            .lock_session_by_id(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))?;
        let member = require_member(uow, member_id).await?;
        self.admit(uow, session, &member).await
    }

    async fn join_by_code_in(
        &self,
        uow: &mut dyn UnitOfWork,
        member_id: MemberId,
        code: InviteCode,
    ) -> AppResult<SessionInfo> {
        let session = uow
            .lock_session_by_code(code)
            .await?
            .ok_or_else(|| AppError::invalid_code("No session matches the invite code"))?;
        let member = require_member(uow, member_id).await?;
        self.admit(uow, session, &member).await
    }

    async fn confirm_join_in(
        &self,
        uow: &mut dyn UnitOfWork,
        member_id: MemberId,
        session_id: SessionId,
    ) -> AppResult<JoinedSessionInfo> {
        let session = uow
            .session_by_id(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))?;
        let member = require_member(uow, member_id).await?;

        uow.active_record_for(member.id, session.id)
            .await?
            .ok_or_else(|| AppError::not_accepted("Member has not joined this session"))?;

        let media_id = player_url::media_id_from(session.media_url.as_deref())
            .ok_or_else(|| AppError::media_not_found("Session has no playable media"))?;
        let media = uow
            .media_by_id(media_id)
            .await?
            .ok_or_else(|| AppError::media_not_found(format!("Media {media_id} not found")))?;
        let playback_url = self.locator.public_url(&media.saved_path)?;

        debug!(
            member_id = %member.id,
            session_id = %session.id,
            media_id = %media_id,
            "Join confirmed"
        );

        Ok(JoinedSessionInfo::new(&session, &member, playback_url))
    }

    async fn leave_in(
        &self,
        uow: &mut dyn UnitOfWork,
        member_id: MemberId,
        session_id: SessionId,
    ) -> AppResult<()> {
        let mut session = uow
            .lock_session_by_id(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))?;
        let member = require_member(uow, member_id).await?;

        let mut record = uow
            .record_for(member.id, session.id)
            .await?
            .ok_or_else(|| AppError::not_found("Member has not joined this session"))?;

        if !record.active {
            debug!(
                member_id = %member.id,
                session_id = %session.id,
                "Member already left"
            );
            return Ok(());
        }

        record.leave();
        session.release();
        uow.update_record(&record).await?;
        uow.save_session(&session).await?;

        info!(
            member_id = %member.id,
            session_id = %session.id,
            occupancy = session.occupancy,
            capacity = session.capacity,
            "Member left session"
        );

        Ok(())
    }

    async fn joined_by_in(
        &self,
        uow: &mut dyn UnitOfWork,
        member_id: MemberId,
    ) -> AppResult<Vec<SessionInfo>> {
        let member = require_member(uow, member_id).await?;
        let records = uow.active_records_by_member(member.id).await?;

        let mut sessions = Vec::with_capacity(records.len());
        for record in records {
            match uow.session_by_id(record.session_id).await? {
                Some(session) => sessions.push(SessionInfo::from(&session)),
                None => warn!(
                    record_id = %record.id,
                    session_id = %record.session_id,
                    "Active join record points at a missing session"
                ),
            }
        }
        Ok(sessions)
    }

    async fn owned_by_in(
        &self,
        uow: &mut dyn UnitOfWork,
        member_id: MemberId,
    ) -> AppResult<Vec<SessionInfo>> {
        let member = require_member(uow, member_id).await?;
        let sessions = uow.sessions_owned_by(member.id).await?;
        Ok(sessions.iter().map(SessionInfo::from).collect())
    }

    async fn create_session_in(
        &self,
        uow: &mut dyn UnitOfWork,
        data: CreateWatchSession,
    ) -> AppResult<SessionInfo> {
        let owner = require_member(uow, data.owner_id).await?;
        let session = data.into_session();
        uow.insert_session(&session).await?;

        info!(
            owner_id = %owner.id,
            session_id = %session.id,
            capacity = session.capacity,
            "Watch session created"
        );

        Ok(SessionInfo::from(&session))
    }

    async fn state_in(
        &self,
        uow: &mut dyn UnitOfWork,
        member_id: MemberId,
        session_id: SessionId,
    ) -> AppResult<MembershipState> {
        let session = uow
            .session_by_id(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))?;
        let record = uow.record_for(member_id, session.id).await?;
        Ok(MembershipState::of(record.as_ref()))
    }

    async fn members_in(
        &self,
        uow: &mut dyn UnitOfWork,
        session_id: SessionId,
    ) -> AppResult<Vec<MemberSummary>> {
        let session = uow
            .session_by_id(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))?;
        let records = uow.active_records_by_session(session.id).await?;

        let joined_at: HashMap<MemberId, _> =
            records.iter().map(|r| (r.member_id, r.created_at)).collect();
        let ids: Vec<MemberId> = records.iter().map(|r| r.member_id).collect();
        let members = uow.members_by_ids(&ids).await?;

        Ok(members
            .into_iter()
            .filter_map(|m| {
                let joined_at = *joined_at.get(&m.id)?;
                Some(MemberSummary {
                    is_owner: session.is_owned_by(&m.id),
                    member_id: m.id,
                    display_name: m.display_name,
                    joined_at,
                })
            })
            .collect())
    }

    async fn reconcile_in(
        &self,
        uow: &mut dyn UnitOfWork,
        session_id: SessionId,
    ) -> AppResult<Reconciliation> {
        let mut session = uow
            .lock_session_by_id(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))?;
        let active = uow.active_records_by_session(session.id).await?.len();
        let actual = i32::try_from(active)
            .map_err(|_| AppError::internal("Active member count out of range"))?;

        let outcome = Reconciliation {
            session_id: session.id,
            previous: session.occupancy,
            actual,
        };

        if outcome.corrected() {
            warn!(
                session_id = %session.id,
                stored = outcome.previous,
                actual = outcome.actual,
                "Occupancy drift detected, reconciling"
            );
            session.reset_occupancy(actual);
            uow.save_session(&session).await?;
        }

        Ok(outcome)
    }

    // ── Transitions ──────────────────────────────────────────────

    /// Route a member to rejoin, no-op, or first join based on their record.
    async fn admit(
        &self,
        uow: &mut dyn UnitOfWork,
        mut session: WatchSession,
        member: &Member,
    ) -> AppResult<SessionInfo> {
        match uow.record_for(member.id, session.id).await? {
            Some(record) if record.active => {
                debug!(
                    member_id = %member.id,
                    session_id = %session.id,
                    "Member already active"
                );
            }
            Some(mut record) => self.rejoin(uow, &mut session, &mut record).await?,
            None => self.first_join(uow, &mut session, member.id).await?,
        }
        Ok(SessionInfo::from(&session))
    }

    /// Capacity-guarded first join. Nothing is written when the session is full.
    async fn first_join(
        &self,
        uow: &mut dyn UnitOfWork,
        session: &mut WatchSession,
        member_id: MemberId,
    ) -> AppResult<()> {
        ensure_room(session, member_id)?;

        let record = JoinRecord::first_join(member_id, session.id);
        uow.insert_record(&record).await?;
        session.admit();
        uow.save_session(session).await?;

        info!(
            member_id = %member_id,
            session_id = %session.id,
            occupancy = session.occupancy,
            capacity = session.capacity,
            "Member joined session"
        );
        Ok(())
    }

    /// Reactivate a departed member. The capacity guard only applies when
    /// `enforce_capacity_on_rejoin` is set.
    async fn rejoin(
        &self,
        uow: &mut dyn UnitOfWork,
        session: &mut WatchSession,
        record: &mut JoinRecord,
    ) -> AppResult<()> {
        if self.config.enforce_capacity_on_rejoin {
            ensure_room(session, record.member_id)?;
        }

        record.come_back();
        session.admit();
        uow.update_record(record).await?;
        uow.save_session(session).await?;

        info!(
            member_id = %record.member_id,
            session_id = %session.id,
            occupancy = session.occupancy,
            capacity = session.capacity,
            "Member rejoined session"
        );
        Ok(())
    }
}

/// Commit the unit if the body succeeded, otherwise roll it back and
/// return the body's error.
async fn finish<T: Send>(mut uow: Box<dyn UnitOfWork>, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

async fn require_member(uow: &mut dyn UnitOfWork, member_id: MemberId) -> AppResult<Member> {
    uow.member_by_id(member_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {member_id} not found")))
}

fn ensure_room(session: &WatchSession, member_id: MemberId) -> AppResult<()> {
    if session.has_room() {
        return Ok(());
    }
    warn!(
        member_id = %member_id,
        session_id = %session.id,
        capacity = session.capacity,
        "Join rejected: session full"
    );
    Err(AppError::capacity_exceeded(format!(
        "Session {} is full ({}/{})",
        session.id, session.occupancy, session.capacity
    )))
}

fn session_not_found(session_id: SessionId) -> AppError {
    AppError::not_found(format!("Session {session_id} not found"))
}
