use crate::AppState;
use log::warn;
use rocket::fs::NamedFile;
use rocket::{get, State};

#[get("/")]
pub async fn index(state: &State<AppState>) -> Option<NamedFile> {
    let path = state.static_dir.join("index.html");
    match NamedFile::open(&path).await {
        Ok(file) => Some(file),
        Err(e) => {
            warn!("Landing page {} unavailable: {e}", path.display());
            None
        }
    }
}
