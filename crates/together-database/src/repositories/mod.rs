//! PostgreSQL repositories for all Together entities.
//!
//! Repositories are stateless and run every query on the connection they
//! are given, which is the transaction of the current unit of work.

pub mod join_record;
pub mod media;
pub mod member;
pub mod session;

pub use join_record::JoinRecordRepository;
pub use media::MediaRepository;
pub use member::MemberRepository;
pub use session::WatchSessionRepository;
