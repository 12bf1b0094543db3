//! Membership domain entities: the join record and its derived state.

pub mod record;
pub mod state;

pub use record::JoinRecord;
pub use state::MembershipState;
