use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::{response, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub youtube_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub title: String,
    pub thumbnail_url: String,
}

/// The label vocabulary of the emotion model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Joy,
    Optimism,
    Sadness,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [
        Emotion::Anger,
        Emotion::Joy,
        Emotion::Optimism,
        Emotion::Sadness,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Joy => "joy",
            Emotion::Optimism => "optimism",
            Emotion::Sadness => "sadness",
        }
    }

    /// Maps a classifier label onto the known vocabulary. Labels are matched exactly.
    pub fn from_label(label: &str) -> Option<Emotion> {
        Emotion::ALL.into_iter().find(|e| e.as_str() == label)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single comment once the classifier has scored it.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRecord {
    pub text: String,
    pub label: String,
    pub score: f32,
}

pub type EmotionTally = BTreeMap<Emotion, usize>;
pub type TopExemplars = BTreeMap<Emotion, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub emotions: EmotionTally,
    pub video_details: VideoDetails,
    pub top_comments_by_emotion: TopExemplars,
    pub total_comments_analyzed: usize,
}

/// JSON error body. `status` picks the HTTP status; recoverable empty results
/// use this shape with `200 OK` and carry the video details.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: Status,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_details: Option<VideoDetails>,
}

impl ErrorResponse {
    pub fn new(status: Status, error: impl Into<String>) -> Self {
        ErrorResponse {
            status,
            error: error.into(),
            video_details: None,
        }
    }

    pub fn with_video_details(mut self, video_details: VideoDetails) -> Self {
        self.video_details = Some(video_details);
        self
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).map_err(|e| {
            log::error!("Failed to serialize error response: {e:?}");
            Status::InternalServerError
        })?;
        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
