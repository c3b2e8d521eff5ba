use crate::classifier::inference::{
    InferenceClassifier, DEFAULT_INFERENCE_BASE_URL, DEFAULT_MAX_INPUT_CHARS,
};
use crate::classifier::DEFAULT_MODEL;
use crate::platform::youtube::{YouTubeClient, DEFAULT_BASE_URL};
use crate::services::analysis_service::CommentAnalyzer;
use crate::AppState;
use anyhow::{Context, Result};
use env_logger::Builder;
use log::{info, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Startup settings, read once from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub youtube_api_key: String,
    pub youtube_api_base_url: Url,
    pub emotion_model: String,
    pub emotion_inference_url: Url,
    pub hf_api_token: Option<String>,
    pub emotion_max_input_chars: usize,
    /// `None` allows every origin.
    pub cors_allowed_origins: Option<Vec<String>>,
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let youtube_api_key = var("YOUTUBE_API_KEY").context(
            "YOUTUBE_API_KEY not found. Set it in the environment or in a .env file.",
        )?;

        let youtube_api_base_url = parse_url(
            "YOUTUBE_API_BASE_URL",
            &var("YOUTUBE_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )?;

        let emotion_model = var("EMOTION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let emotion_inference_url = parse_url(
            "EMOTION_INFERENCE_URL",
            &var("EMOTION_INFERENCE_URL")
                .unwrap_or_else(|| format!("{DEFAULT_INFERENCE_BASE_URL}/{emotion_model}")),
        )?;

        let emotion_max_input_chars = match var("EMOTION_MAX_INPUT_CHARS") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&chars| chars > 0)
                .with_context(|| {
                    format!("EMOTION_MAX_INPUT_CHARS must be a positive integer, got {value:?}")
                })?,
            None => DEFAULT_MAX_INPUT_CHARS,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty() && !origins.iter().any(|o| o == "*"));

        Ok(AppConfig {
            youtube_api_key,
            youtube_api_base_url,
            emotion_model,
            emotion_inference_url,
            hf_api_token: var("HF_API_TOKEN"),
            emotion_max_input_chars,
            cors_allowed_origins,
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
        })
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url> {
    Url::parse(value).with_context(|| format!("{key} is not a valid URL: {value:?}"))
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting Rocket backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

/// Builds the shared clients. Both are created once and reused by every request.
pub fn create_app_state(config: &AppConfig) -> AppState {
    let platform = YouTubeClient::new(
        config.youtube_api_base_url.clone(),
        config.youtube_api_key.clone(),
    );

    let classifier =
        InferenceClassifier::new(config.emotion_inference_url.clone(), config.emotion_model.clone())
            .with_api_token(config.hf_api_token.clone())
            .with_max_input_chars(config.emotion_max_input_chars);
    info!("Emotion classifier endpoint: {}", classifier.endpoint());

    AppState {
        analyzer: CommentAnalyzer::new(Arc::new(platform), Arc::new(classifier)),
        static_dir: config.static_dir.clone(),
    }
}

pub fn create_cors(config: &AppConfig) -> Result<rocket_cors::Cors> {
    let allowed_origins = match &config.cors_allowed_origins {
        Some(origins) => AllowedOrigins::some_exact(origins.as_slice()),
        None => AllowedOrigins::all(),
    };

    let cors = CorsOptions::default()
        .allowed_origins(allowed_origins)
        .allowed_methods(
            vec![Method::Get, Method::Post, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
