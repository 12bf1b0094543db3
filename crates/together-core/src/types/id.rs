//! Typed identifiers for sessions, members, and join records.
//!
//! Identifiers are UUIDv7, so ordering by id follows creation order. With
//! the `sqlx` feature each type maps transparently to a PostgreSQL `UUID`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        #[cfg_attr(feature = "sqlx", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Mint a fresh time-ordered identifier.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// The inner UUID.
            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::try_parse(s.trim()).map(Self)
            }
        }
    };
}

define_id!(
    /// A watch-together session.
    SessionId
);

define_id!(
    /// A member who can own and join sessions.
    MemberId
);

define_id!(
    /// The single join record of a (member, session) pair.
    JoinRecordId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_v7() {
        let id = SessionId::new();
        assert_eq!(id.0.get_version_num(), 7);
        assert_ne!(id, SessionId::new());
    }

    #[test]
    fn test_parse_accepts_cli_input() {
        let uuid = Uuid::now_v7();
        let id: MemberId = format!("  {uuid} ").parse().expect("should parse");
        assert_eq!(id.into_uuid(), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
        assert!("member-7".parse::<MemberId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = JoinRecordId::new();
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{}\"", id.0));
    }
}
