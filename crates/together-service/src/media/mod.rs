//! Media URL resolution.

pub mod locator;

pub use locator::PublicUrlLocator;
