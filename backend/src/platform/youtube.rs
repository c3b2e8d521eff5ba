use crate::models::VideoDetails;
use crate::pipeline::video_id::VideoId;
use crate::platform::{CommentPage, PlatformError, VideoPlatform};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

// Documentation: https://developers.google.com/youtube/v3/docs/videos/list
#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

// Documentation: https://developers.google.com/youtube/v3/docs/commentThreads/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: Comment,
}

#[derive(Debug, Deserialize)]
struct Comment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_display: String,
}

// Google API error envelope: {"error": {"code", "message", "errors": [{"reason", ...}]}}
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    reason: Option<String>,
}

/// YouTube Data API v3 client authenticated with an API key.
pub struct YouTubeClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        YouTubeClient {
            client: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{resource}", self.base_url.as_str().trim_end_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T, PlatformError> {
        let response = self
            .client
            .get(self.endpoint(resource))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        decode(resource, &body)
    }
}

#[rocket::async_trait]
impl VideoPlatform for YouTubeClient {
    async fn video_details(&self, video_id: &VideoId) -> Result<Option<VideoDetails>, PlatformError> {
        let response: VideoListResponse = self
            .get("videos", &[("part", "snippet"), ("id", video_id.as_str())])
            .await?;
        video_details_from(response)
    }

    async fn comment_page(
        &self,
        video_id: &VideoId,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<CommentPage, PlatformError> {
        let max_results = max_results.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video_id.as_str()),
            ("maxResults", max_results.as_str()),
            ("textFormat", "plainText"),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response: CommentThreadListResponse = self.get("commentThreads", &query).await?;
        Ok(comment_page_from(response))
    }
}

fn decode<T: DeserializeOwned>(resource: &str, body: &str) -> Result<T, PlatformError> {
    serde_json::from_str(body)
        .map_err(|e| PlatformError::Malformed(format!("{resource} response: {e}")))
}

fn video_details_from(response: VideoListResponse) -> Result<Option<VideoDetails>, PlatformError> {
    let Some(item) = response.items.into_iter().next() else {
        return Ok(None);
    };

    let thumbnail = item
        .snippet
        .thumbnails
        .medium
        .ok_or_else(|| PlatformError::Malformed("video snippet has no medium thumbnail".into()))?;

    Ok(Some(VideoDetails {
        title: item.snippet.title,
        thumbnail_url: thumbnail.url,
    }))
}

fn comment_page_from(response: CommentThreadListResponse) -> CommentPage {
    CommentPage {
        comments: response
            .items
            .into_iter()
            .map(|thread| thread.snippet.top_level_comment.snippet.text_display)
            .collect(),
        next_page_token: response.next_page_token.filter(|token| !token.is_empty()),
    }
}

fn api_error(status: u16, body: &str) -> PlatformError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => PlatformError::Api {
            status,
            reason: envelope
                .error
                .errors
                .into_iter()
                .next()
                .and_then(|detail| detail.reason),
            message: envelope.error.message,
        },
        Err(_) => PlatformError::Api {
            status,
            reason: None,
            message: body.chars().take(200).collect(),
        },
    }
}
