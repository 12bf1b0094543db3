//! Invite code token used as an alternate session lookup key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, ErrorKind};

/// Length of the hyphenated `8-4-4-4-12` textual form.
const CANONICAL_LEN: usize = 36;

/// A 128-bit invite code.
///
/// Only the hyphenated textual form is accepted when parsing user input;
/// the simple, braced, and URN forms are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteCode(Uuid);

impl InviteCode {
    /// Generate a fresh random invite code.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-stored code.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse user-supplied text as a canonical invite code.
    pub fn parse(code: &str) -> Result<Self, AppError> {
        if code.len() != CANONICAL_LEN {
            return Err(AppError::invalid_code("Invite code is not a valid token"));
        }
        Uuid::try_parse(code)
            .map(Self)
            .map_err(|e| {
                AppError::with_source(ErrorKind::InvalidCode, "Invite code is not a valid token", e)
            })
    }

    /// Return the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Return the inner UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for InviteCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
