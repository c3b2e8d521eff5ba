//! Emotion scoring backends.
//!
//! A classifier maps a batch of texts to, per text, scores over the model's
//! label vocabulary. The handle is built once at startup and shared read-only
//! between requests.

pub mod inference;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "cardiffnlp/twitter-roberta-base-emotion-latest";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("request to the classifier failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("classifier returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected classifier payload: {0}")]
    Malformed(String),

    #[error("classifier returned {actual} results for a batch of {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

#[rocket::async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Scores every text of the batch. The outer vector has one entry per
    /// input text, in input order.
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Vec<LabelScore>>, ClassifierError>;

    fn model_name(&self) -> &str;
}
