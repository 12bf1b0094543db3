//! # together-database
//!
//! Unit-of-work store traits consumed by the membership service, the
//! PostgreSQL implementation backed by sqlx, and an in-memory
//! implementation for single-node use and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryMembershipStore;
pub use postgres::PgMembershipStore;
pub use store::{
    JoinRecordStore, MediaStore, MemberStore, MembershipStore, SessionStore, UnitOfWork,
};
