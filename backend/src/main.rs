use emotion_backend::build_rocket;
use emotion_backend::config::{
    create_app_state, create_cors, init_logger, load_environment, AppConfig,
};
use log::{error, info};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    load_environment();
    init_logger();

    let config = AppConfig::from_env()?;
    let cors = create_cors(&config)?;
    let state = create_app_state(&config);
    info!("Emotion model {} ready", state.analyzer.model_name());

    if let Err(e) = build_rocket(state, Some(cors)).launch().await {
        error!("Rocket failed to launch: {e}");
        return Err(anyhow::anyhow!("Rocket failed to launch"));
    }
    Ok(())
}
