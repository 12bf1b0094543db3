//! # together-entity
//!
//! Domain entity models for Together. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod media;
pub mod member;
pub mod membership;
pub mod session;
