#![allow(dead_code)]

use emotion_backend::classifier::{ClassifierError, EmotionClassifier, LabelScore};
use emotion_backend::models::{Emotion, VideoDetails};
use emotion_backend::pipeline::VideoId;
use emotion_backend::platform::{
    CommentPage, PlatformError, VideoPlatform, COMMENTS_DISABLED_REASON,
};
use emotion_backend::services::analysis_service::CommentAnalyzer;
use emotion_backend::{build_rocket, AppState};
use rocket::local::asynchronous::Client;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const VIDEO_ID: &str = "dQw4w9WgXcQ";

pub fn details() -> VideoDetails {
    VideoDetails {
        title: "T".to_string(),
        thumbnail_url: "u".to_string(),
    }
}

pub enum Comments {
    Pages(Vec<Vec<String>>),
    Disabled,
    Fails { status: u16, reason: &'static str },
}

/// In-memory video platform serving one known video.
pub struct FakePlatform {
    pub details: Option<VideoDetails>,
    pub comments: Comments,
    pub metadata_calls: AtomicUsize,
    pub comment_calls: AtomicUsize,
}

impl FakePlatform {
    pub fn with_pages(pages: Vec<Vec<&str>>) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| page.into_iter().map(String::from).collect())
            .collect();
        FakePlatform::new(Some(details()), Comments::Pages(pages))
    }

    pub fn new(details: Option<VideoDetails>, comments: Comments) -> Self {
        FakePlatform {
            details,
            comments,
            metadata_calls: AtomicUsize::new(0),
            comment_calls: AtomicUsize::new(0),
        }
    }
}

#[rocket::async_trait]
impl VideoPlatform for FakePlatform {
    async fn video_details(&self, video_id: &VideoId) -> Result<Option<VideoDetails>, PlatformError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        if video_id.as_str() != VIDEO_ID {
            return Ok(None);
        }
        Ok(self.details.clone())
    }

    async fn comment_page(
        &self,
        _: &VideoId,
        _: u32,
        page_token: Option<&str>,
    ) -> Result<CommentPage, PlatformError> {
        self.comment_calls.fetch_add(1, Ordering::SeqCst);
        match &self.comments {
            Comments::Pages(pages) => {
                let index: usize = page_token.map_or(0, |token| token.parse().unwrap_or(0));
                Ok(CommentPage {
                    comments: pages.get(index).cloned().unwrap_or_default(),
                    next_page_token: (index + 1 < pages.len()).then(|| (index + 1).to_string()),
                })
            }
            Comments::Disabled => Err(PlatformError::Api {
                status: 403,
                reason: Some(COMMENTS_DISABLED_REASON.to_string()),
                message: "The video identified by the videoId parameter has disabled comments."
                    .to_string(),
            }),
            Comments::Fails { status, reason } => Err(PlatformError::Api {
                status: *status,
                reason: Some(reason.to_string()),
                message: format!("secret upstream detail: {reason}"),
            }),
        }
    }
}

/// Assigns fixed (label, score) pairs per text; unknown texts get `optimism` at 0.5.
/// Every text gets scores for all four labels, the assigned one being the highest.
pub struct StubClassifier {
    assignments: HashMap<String, (String, f32)>,
    pub seen: Mutex<Vec<String>>,
    pub batches: AtomicUsize,
    pub fail: bool,
}

impl StubClassifier {
    pub fn new(assignments: &[(&str, &str, f32)]) -> Self {
        StubClassifier {
            assignments: assignments
                .iter()
                .map(|(text, label, score)| (text.to_string(), (label.to_string(), *score)))
                .collect(),
            seen: Mutex::new(Vec::new()),
            batches: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        StubClassifier {
            fail: true,
            ..StubClassifier::new(&[])
        }
    }
}

#[rocket::async_trait]
impl EmotionClassifier for StubClassifier {
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Vec<LabelScore>>, ClassifierError> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClassifierError::Api {
                status: 503,
                message: "model overloaded".to_string(),
            });
        }
        self.seen.lock().unwrap().extend(texts.iter().cloned());

        Ok(texts
            .iter()
            .map(|text| {
                let (label, score) = self
                    .assignments
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| ("optimism".to_string(), 0.5));
                let rest = (1.0 - score) / 3.0;
                let mut scores: Vec<LabelScore> = Emotion::ALL
                    .iter()
                    .filter(|e| e.as_str() != label)
                    .map(|e| LabelScore {
                        label: e.as_str().to_string(),
                        score: rest,
                    })
                    .collect();
                scores.push(LabelScore { label, score });
                scores
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

pub fn state(platform: Arc<FakePlatform>, classifier: Arc<StubClassifier>) -> AppState {
    AppState {
        analyzer: CommentAnalyzer::new(platform, classifier),
        static_dir: PathBuf::from("static"),
    }
}

pub async fn client(platform: Arc<FakePlatform>, classifier: Arc<StubClassifier>) -> Client {
    Client::tracked(build_rocket(state(platform, classifier), None))
        .await
        .expect("valid rocket instance")
}
