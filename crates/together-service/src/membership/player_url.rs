//! Extraction of the media id embedded in a session's player URL.

use std::sync::LazyLock;

use regex::Regex;

use together_core::types::MediaId;

/// Player path segment followed by the numeric media id.
static PLAYER_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/video-player/([0-9]+)").expect("player path pattern is valid")
});

/// Return the media id of the first `/video-player/<digits>` segment.
///
/// A missing URL, a URL without the segment, or digits that do not fit
/// an `i64` all yield `None`.
pub fn media_id_from(url: Option<&str>) -> Option<MediaId> {
    let captures = PLAYER_PATH.captures(url?)?;
    captures.get(1)?.as_str().parse::<i64>().ok().map(MediaId)
}
