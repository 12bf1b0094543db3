//! Core type definitions used across the Together workspace.

pub mod id;
pub mod invite_code;
pub mod media_ref;

pub use id::*;
pub use invite_code::InviteCode;
pub use media_ref::MediaId;
