//! Watch-together membership: join, rejoin, leave, and confirm.

pub mod info;
pub mod player_url;
pub mod service;

pub use info::{JoinedSessionInfo, MemberSummary, Reconciliation, SessionInfo};
pub use service::{CreateSessionRequest, MembershipService};
