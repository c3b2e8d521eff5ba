use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use thiserror::Error;

lazy_static! {
    // Watch page, short domain, embed player. Tried in this order.
    static ref VIDEO_URL_PATTERNS: Vec<Regex> = [
        r"(?:https?://)?(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtu\.be/([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtube\.com/embed/([a-zA-Z0-9_-]{11})",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid YouTube URL")]
pub struct InvalidUrl;

/// An 11 character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Extracts the video id from a watch, `youtu.be` or embed URL.
    pub fn parse(url: &str) -> Result<Self, InvalidUrl> {
        VIDEO_URL_PATTERNS
            .iter()
            .find_map(|pattern| pattern.captures(url))
            .and_then(|captures| captures.get(1))
            .map(|m| VideoId(m.as_str().to_string()))
            .ok_or(InvalidUrl)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
