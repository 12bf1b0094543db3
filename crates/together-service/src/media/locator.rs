//! Public URL locator for media stored in an object bucket.

use together_core::config::MediaConfig;
use together_core::error::AppError;
use together_core::result::AppResult;
use together_core::traits::MediaLocator;

/// Builds playback URLs by joining a public origin and the object key.
#[derive(Debug, Clone)]
pub struct PublicUrlLocator {
    /// Public origin without a trailing slash.
    base_url: String,
}

impl PublicUrlLocator {
    /// Creates a locator from configuration.
    pub fn from_config(config: &MediaConfig) -> AppResult<Self> {
        Self::new(&config.public_base_url)
    }

    /// Creates a locator for the given public origin.
    pub fn new(base_url: &str) -> AppResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(AppError::configuration("media.public_base_url must not be empty"));
        }
        Ok(Self {
            base_url: base_url.to_string(),
        })
    }
}

impl MediaLocator for PublicUrlLocator {
    fn public_url(&self, storage_path: &str) -> AppResult<String> {
        let key = storage_path.trim().trim_start_matches('/');
        if key.is_empty() {
            return Err(AppError::media_not_found("Media has no stored path"));
        }
        Ok(format!("{}/{}", self.base_url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use together_core::error::ErrorKind;

    #[test]
    fn test_joins_base_and_key() {
        let locator = PublicUrlLocator::new("https://bucket.s3.amazonaws.com/").expect("locator");
        let url = locator
            .public_url("/videos/hls/25/01/01/abc/master.m3u8")
            .expect("url");
        assert_eq!(
            url,
            "https://bucket.s3.amazonaws.com/videos/hls/25/01/01/abc/master.m3u8"
        );
    }

    #[test]
    fn test_empty_path_is_media_not_found() {
        let locator = PublicUrlLocator::new("https://cdn.example.com").expect("locator");
        let err = locator.public_url("  ").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MediaNotFound);
    }

    #[test]
    fn test_empty_base_is_configuration_error() {
        let err = PublicUrlLocator::new(" / ").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
