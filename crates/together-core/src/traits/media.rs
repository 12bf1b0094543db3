//! Media locator trait for resolving stored media to playback URLs.

use crate::result::AppResult;

/// Resolves a media item's storage path to a publicly reachable URL.
///
/// Implementations typically prefix the object key with a bucket or CDN
/// origin; they do not check that the object exists.
pub trait MediaLocator: Send + Sync + std::fmt::Debug + 'static {
    /// Build the public playback URL for the given storage path.
    fn public_url(&self, storage_path: &str) -> AppResult<String>;
}
