//! Media domain entities.

pub mod model;

pub use model::Media;
