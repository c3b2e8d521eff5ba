use crate::classifier::{ClassifierError, EmotionClassifier, LabelScore};
use crate::models::Emotion;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MAX_INPUT_CHARS: usize = 1000;

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: Vec<&'a str>,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    top_k: usize,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<Vec<LabelScore>>),
    // Some deployments flatten the output of a single-input request.
    Single(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct InferenceErrorBody {
    error: String,
}

/// Text-classification model served behind a Hugging Face style inference
/// endpoint.
pub struct InferenceClassifier {
    client: Client,
    endpoint: Url,
    api_token: Option<String>,
    model: String,
    max_input_chars: usize,
}

impl InferenceClassifier {
    pub fn new(endpoint: Url, model: impl Into<String>) -> Self {
        InferenceClassifier {
            client: Client::new(),
            endpoint,
            api_token: None,
            model: model.into(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }

    pub fn with_api_token(mut self, api_token: Option<String>) -> Self {
        self.api_token = api_token.filter(|token| !token.is_empty());
        self
    }

    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[rocket::async_trait]
impl EmotionClassifier for InferenceClassifier {
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Vec<LabelScore>>, ClassifierError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = InferenceRequest {
            inputs: texts
                .iter()
                .map(|text| truncate_chars(text, self.max_input_chars))
                .collect(),
            parameters: InferenceParameters {
                top_k: Emotion::ALL.len(),
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<InferenceErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| text.chars().take(200).collect());
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        decode_scores(&text, texts.len())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn decode_scores(body: &str, expected: usize) -> Result<Vec<Vec<LabelScore>>, ClassifierError> {
    let response: InferenceResponse =
        serde_json::from_str(body).map_err(|e| ClassifierError::Malformed(e.to_string()))?;

    let scores = match response {
        InferenceResponse::Batch(scores) => scores,
        InferenceResponse::Single(scores) if expected == 1 => vec![scores],
        InferenceResponse::Single(_) => {
            return Err(ClassifierError::Malformed(
                "flat score list for a multi-text batch".to_string(),
            ))
        }
    };

    if scores.len() != expected {
        return Err(ClassifierError::LengthMismatch {
            expected,
            actual: scores.len(),
        });
    }
    Ok(scores)
}

/// Cuts `text` down to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("😀😀😀", 2), "😀😀");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn request_body_matches_inference_api() {
        let texts = ["great song!!".to_string(), "x".repeat(20)];
        let body = InferenceRequest {
            inputs: texts.iter().map(|t| truncate_chars(t, 8)).collect(),
            parameters: InferenceParameters { top_k: 4 },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "inputs": ["great so", "xxxxxxxx"],
                "parameters": { "top_k": 4 },
                "options": { "wait_for_model": true }
            })
        );
    }

    #[test]
    fn decodes_batched_scores() {
        let body = r#"[
            [{"label": "joy", "score": 0.9}, {"label": "optimism", "score": 0.05}],
            [{"label": "anger", "score": 0.6}, {"label": "sadness", "score": 0.3}]
        ]"#;

        let scores = decode_scores(body, 2).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0][0].label, "joy");
        assert_eq!(scores[1][1].label, "sadness");
    }

    #[test]
    fn accepts_flat_list_for_single_input_only() {
        let body = r#"[{"label": "sadness", "score": 0.8}, {"label": "joy", "score": 0.2}]"#;

        let scores = decode_scores(body, 1).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].len(), 2);

        assert!(matches!(
            decode_scores(body, 2),
            Err(ClassifierError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_result_count_mismatch() {
        let body = r#"[[{"label": "joy", "score": 0.9}]]"#;
        assert!(matches!(
            decode_scores(body, 3),
            Err(ClassifierError::LengthMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            decode_scores("Service Unavailable", 1),
            Err(ClassifierError::Malformed(_))
        ));
    }

    #[test]
    fn empty_token_is_dropped() {
        let endpoint = Url::parse("http://localhost:9000/models/test").unwrap();
        let classifier = InferenceClassifier::new(endpoint, "test").with_api_token(Some(String::new()));
        assert!(classifier.api_token.is_none());
    }
}
