//! Read-only access to the video platform.
//!
//! The analysis pipeline only needs two calls: the snippet of a single video
//! and one page of its top-level comment threads. [`youtube::YouTubeClient`]
//! implements them against the YouTube Data API v3.

pub mod youtube;

use crate::models::VideoDetails;
use crate::pipeline::video_id::VideoId;
use thiserror::Error;

/// Error reason YouTube reports when a video has its comment section turned off.
pub const COMMENTS_DISABLED_REASON: &str = "commentsDisabled";

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("request to the video platform failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("video platform returned {status}: {message} (reason: {})", .reason.as_deref().unwrap_or("unknown"))]
    Api {
        status: u16,
        reason: Option<String>,
        message: String,
    },

    #[error("unexpected video platform payload: {0}")]
    Malformed(String),
}

impl PlatformError {
    pub fn is_comments_disabled(&self) -> bool {
        matches!(
            self,
            PlatformError::Api { reason: Some(reason), .. } if reason == COMMENTS_DISABLED_REASON
        )
    }
}

/// One page of top-level comment texts, in platform order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentPage {
    pub comments: Vec<String>,
    pub next_page_token: Option<String>,
}

#[rocket::async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Title and thumbnail of the video, `None` when the id is unknown.
    async fn video_details(&self, video_id: &VideoId) -> Result<Option<VideoDetails>, PlatformError>;

    /// A page of at most `max_results` comment threads, starting at `page_token`.
    async fn comment_page(
        &self,
        video_id: &VideoId,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<CommentPage, PlatformError>;
}
