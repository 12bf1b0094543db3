//! Request context carrying the authenticated member.

use serde::{Deserialize, Serialize};

use together_core::types::MemberId;

/// Context for the current authenticated request.
///
/// Built by the front end after authentication and passed into service
/// methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated member's ID.
    pub member_id: MemberId,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(member_id: MemberId) -> Self {
        Self { member_id }
    }
}
