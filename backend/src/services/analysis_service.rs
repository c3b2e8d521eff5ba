use crate::classifier::{ClassifierError, EmotionClassifier};
use crate::models::{AnalysisResult, VideoDetails};
use crate::pipeline::{aggregate, classify_comments, fetch_comments, InvalidUrl, VideoId};
use crate::platform::{PlatformError, VideoPlatform};
use log::{info, warn};
use rocket::http::Status;
use std::sync::Arc;
use thiserror::Error;

/// Why a video produced nothing to classify. Both cases answer `200 OK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    CommentsDisabled,
    NoMeaningfulComments,
}

impl EmptyReason {
    pub fn message(self) -> &'static str {
        match self {
            EmptyReason::CommentsDisabled => "Comments are disabled for this video.",
            EmptyReason::NoMeaningfulComments => {
                "No meaningful comments found or comments are disabled for this video."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Analyzed(AnalysisResult),
    Empty {
        reason: EmptyReason,
        video_details: VideoDetails,
    },
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("youtube_url is required")]
    MissingUrl,

    #[error(transparent)]
    InvalidUrl(#[from] InvalidUrl),

    #[error("video {0} not found")]
    VideoNotFound(VideoId),

    #[error("video platform request failed: {0}")]
    Upstream(#[source] PlatformError),

    #[error("video platform sent an unusable response: {0}")]
    UpstreamPayload(#[source] PlatformError),

    #[error("emotion classification failed: {0}")]
    Classification(#[from] ClassifierError),
}

impl AnalysisError {
    fn from_platform(err: PlatformError) -> Self {
        match err {
            PlatformError::Malformed(_) => AnalysisError::UpstreamPayload(err),
            _ => AnalysisError::Upstream(err),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            AnalysisError::MissingUrl | AnalysisError::InvalidUrl(_) | AnalysisError::Upstream(_) => {
                Status::BadRequest
            }
            AnalysisError::VideoNotFound(_) => Status::NotFound,
            AnalysisError::UpstreamPayload(_) | AnalysisError::Classification(_) => {
                Status::InternalServerError
            }
        }
    }

    /// Message safe to hand back to the caller. Upstream and internal causes
    /// stay in the server log.
    pub fn public_message(&self) -> &'static str {
        match self {
            AnalysisError::MissingUrl => "youtube_url is required",
            AnalysisError::InvalidUrl(_) => "Invalid YouTube URL",
            AnalysisError::VideoNotFound(_) => "Video not found.",
            AnalysisError::Upstream(_) => {
                "Could not retrieve comments. Please check the video URL and API key."
            }
            AnalysisError::UpstreamPayload(_) | AnalysisError::Classification(_) => {
                "An internal server error occurred."
            }
        }
    }
}

/// Runs the comment analysis pipeline for one video URL.
///
/// The platform client and the classifier are shared, read-only handles; a
/// single analyzer serves every request.
#[derive(Clone)]
pub struct CommentAnalyzer {
    platform: Arc<dyn VideoPlatform>,
    classifier: Arc<dyn EmotionClassifier>,
}

impl CommentAnalyzer {
    pub fn new(platform: Arc<dyn VideoPlatform>, classifier: Arc<dyn EmotionClassifier>) -> Self {
        CommentAnalyzer {
            platform,
            classifier,
        }
    }

    pub fn model_name(&self) -> &str {
        self.classifier.model_name()
    }

    pub async fn analyze(&self, youtube_url: &str) -> Result<AnalysisOutcome, AnalysisError> {
        let video_id = VideoId::parse(youtube_url)?;
        info!("Analyzing comments for video {video_id}");

        let video_details = self
            .platform
            .video_details(&video_id)
            .await
            .map_err(AnalysisError::from_platform)?
            .ok_or_else(|| AnalysisError::VideoNotFound(video_id.clone()))?;

        let fetched = match fetch_comments(self.platform.as_ref(), &video_id).await {
            Ok(fetched) => fetched,
            Err(e) if e.is_comments_disabled() => {
                warn!("Comments are disabled for video {video_id}");
                return Ok(AnalysisOutcome::Empty {
                    reason: EmptyReason::CommentsDisabled,
                    video_details,
                });
            }
            Err(e) => return Err(AnalysisError::from_platform(e)),
        };

        if fetched.comments.is_empty() {
            warn!(
                "No meaningful comments for video {video_id} ({} fetched)",
                fetched.raw_count
            );
            return Ok(AnalysisOutcome::Empty {
                reason: EmptyReason::NoMeaningfulComments,
                video_details,
            });
        }

        let records = classify_comments(self.classifier.as_ref(), fetched.comments).await?;
        let result = aggregate(&records, video_details);

        info!(
            "Analyzed {} of {} comments for video {video_id}",
            result.total_comments_analyzed, fetched.raw_count
        );
        Ok(AnalysisOutcome::Analyzed(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_taxonomy_maps_to_status_codes() {
        let id = VideoId::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let quota = PlatformError::Api {
            status: 403,
            reason: Some("quotaExceeded".to_string()),
            message: "quota".to_string(),
        };

        assert_eq!(AnalysisError::MissingUrl.status(), Status::BadRequest);
        assert_eq!(AnalysisError::InvalidUrl(InvalidUrl).status(), Status::BadRequest);
        assert_eq!(AnalysisError::VideoNotFound(id).status(), Status::NotFound);
        assert_eq!(AnalysisError::from_platform(quota).status(), Status::BadRequest);
        assert_eq!(
            AnalysisError::from_platform(PlatformError::Malformed("x".to_string())).status(),
            Status::InternalServerError
        );
        assert_eq!(
            AnalysisError::from(ClassifierError::Malformed("x".to_string())).status(),
            Status::InternalServerError
        );
    }

    #[test]
    fn public_messages_hide_upstream_details() {
        let err = AnalysisError::from_platform(PlatformError::Api {
            status: 400,
            reason: Some("keyInvalid".to_string()),
            message: "API key not valid. Please pass a valid API key.".to_string(),
        });

        assert!(err.to_string().contains("API key not valid"));
        assert!(!err.public_message().contains("not valid"));
    }

    #[test]
    fn empty_reasons_have_distinct_messages() {
        assert_ne!(
            EmptyReason::CommentsDisabled.message(),
            EmptyReason::NoMeaningfulComments.message()
        );
    }
}
