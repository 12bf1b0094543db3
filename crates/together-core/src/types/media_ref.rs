//! Numeric media identifier embedded in session player URLs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a playable media item (video).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(pub i64);

impl MediaId {
    /// Return the raw numeric value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
