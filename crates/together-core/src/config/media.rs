//! Media URL configuration.

use serde::{Deserialize, Serialize};

/// Settings for turning stored media paths into playback URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Public origin of the media bucket or CDN, e.g.
    /// `https://bucket.s3.ap-northeast-2.amazonaws.com`.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_public_base_url() -> String {
    "http://localhost:9000/media".to_string()
}
