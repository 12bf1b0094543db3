//! Membership rule configuration.

use serde::{Deserialize, Serialize};

/// Rules applied by the membership service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipConfig {
    /// Run the capacity guard when a departed member rejoins.
    ///
    /// Off by default: a member who left may rejoin a session that has
    /// since filled up.
    #[serde(default)]
    pub enforce_capacity_on_rejoin: bool,
}
