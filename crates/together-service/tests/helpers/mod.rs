//! Shared fixtures for membership service tests.

#![allow(dead_code)]

pub mod pg;

use std::sync::Arc;

use together_core::config::MembershipConfig;
use together_database::MemoryMembershipStore;
use together_entity::member::Member;
use together_entity::session::{CreateWatchSession, WatchSession};
use together_service::{MembershipService, PublicUrlLocator, RequestContext};

/// Public origin used by the test locator.
pub const MEDIA_BASE: &str = "https://media.test";

/// Service under test plus direct access to its backing store.
pub struct TestApp {
    pub store: MemoryMembershipStore,
    pub service: MembershipService,
}

impl TestApp {
    /// Service with default rules: rejoin skips the capacity guard.
    pub fn new() -> Self {
        Self::with_config(MembershipConfig::default())
    }

    pub fn with_config(config: MembershipConfig) -> Self {
        let store = MemoryMembershipStore::new();
        let locator = PublicUrlLocator::new(MEDIA_BASE).expect("locator");
        let service = MembershipService::new(Arc::new(store.clone()), Arc::new(locator), config);
        Self { store, service }
    }

    pub async fn member(&self, name: &str) -> (Member, RequestContext) {
        let member = self.store.add_member(name).await;
        let ctx = RequestContext::new(member.id);
        (member, ctx)
    }

    pub async fn session(&self, owner: &Member, capacity: i32) -> WatchSession {
        self.session_with_media(owner, capacity, None).await
    }

    pub async fn session_with_media(
        &self,
        owner: &Member,
        capacity: i32,
        media_url: Option<&str>,
    ) -> WatchSession {
        self.store
            .add_session(CreateWatchSession {
                owner_id: owner.id,
                title: "Movie night".to_string(),
                capacity,
                media_url: media_url.map(str::to_string),
            })
            .await
    }

    /// Committed occupancy of a session.
    pub async fn occupancy(&self, session: &WatchSession) -> i32 {
        self.store
            .session(session.id)
            .await
            .expect("session exists")
            .occupancy
    }
}
