//! Core traits defined in `together-core` and implemented by other crates.

pub mod media;
pub mod service;

pub use media::MediaLocator;
pub use service::Service;
