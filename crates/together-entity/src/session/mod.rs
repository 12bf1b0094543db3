//! Watch-together session domain entities.

pub mod model;

pub use model::{CreateWatchSession, WatchSession};
