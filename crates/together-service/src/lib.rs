//! # together-service
//!
//! Business logic service layer for Together. The membership service
//! admits members to watch-together sessions, lets them leave and rejoin,
//! and resolves the playback URL once a member is in.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod media;
pub mod membership;

pub use context::RequestContext;
pub use media::PublicUrlLocator;
pub use membership::{
    CreateSessionRequest, JoinedSessionInfo, MemberSummary, MembershipService, Reconciliation,
    SessionInfo,
};
