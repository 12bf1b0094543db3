//! # together-core
//!
//! Core crate for Together. Contains configuration schemas, typed
//! identifiers, the invite-code token, collaborator traits, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Together crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
