pub mod api;
pub mod classifier;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod platform;
pub mod services;

use rocket::{routes, Build, Rocket};
use services::analysis_service::CommentAnalyzer;
use std::path::PathBuf;

pub struct AppState {
    pub analyzer: CommentAnalyzer,
    pub static_dir: PathBuf,
}

/// Mounts the landing page and the analysis endpoint on a fresh Rocket instance.
pub fn build_rocket(state: AppState, cors: Option<rocket_cors::Cors>) -> Rocket<Build> {
    let rocket = rocket::build()
        .manage(state)
        .mount("/", routes![api::index, api::analyze]);

    match cors {
        Some(cors) => rocket.attach(cors),
        None => rocket,
    }
}
