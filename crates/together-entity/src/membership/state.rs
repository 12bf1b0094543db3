//! Derived membership state of a (member, session) pair.

use serde::{Deserialize, Serialize};

use super::record::JoinRecord;

/// Where a member stands with respect to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipState {
    /// No join record exists.
    NonMember,
    /// A record exists and the member is present.
    Active,
    /// A record exists but the member has left.
    Inactive,
}

impl MembershipState {
    /// Derive the state from the pair's join record, if any.
    pub fn of(record: Option<&JoinRecord>) -> Self {
        match record {
            None => Self::NonMember,
            Some(r) if r.active => Self::Active,
            Some(_) => Self::Inactive,
        }
    }

    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonMember => "non_member",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for MembershipState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
