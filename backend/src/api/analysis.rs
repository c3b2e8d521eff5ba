use crate::models::{AnalysisResult, AnalyzeRequest, ErrorResponse};
use crate::services::analysis_service::{AnalysisError, AnalysisOutcome};
use crate::AppState;
use log::{error, warn};
use rocket::http::Status;
use rocket::serde::json::{self, Json};
use rocket::{post, State};

impl From<AnalysisError> for ErrorResponse {
    fn from(err: AnalysisError) -> Self {
        ErrorResponse::new(err.status(), err.public_message())
    }
}

#[post("/analyze", data = "<request>")]
pub async fn analyze(
    state: &State<AppState>,
    request: Result<Json<AnalyzeRequest>, json::Error<'_>>,
) -> Result<Json<AnalysisResult>, ErrorResponse> {
    let youtube_url = match request {
        Ok(Json(AnalyzeRequest {
            youtube_url: Some(url),
        })) => url,
        Ok(_) => return Err(AnalysisError::MissingUrl.into()),
        Err(e) => {
            warn!("Rejected analyze request body: {e:?}");
            return Err(AnalysisError::MissingUrl.into());
        }
    };

    match state.analyzer.analyze(&youtube_url).await {
        Ok(AnalysisOutcome::Analyzed(result)) => Ok(Json(result)),
        Ok(AnalysisOutcome::Empty {
            reason,
            video_details,
        }) => Err(ErrorResponse::new(Status::Ok, reason.message()).with_video_details(video_details)),
        Err(e) => {
            match &e {
                AnalysisError::Upstream(_) => error!("An API error occurred: {e}"),
                AnalysisError::UpstreamPayload(_) | AnalysisError::Classification(_) => {
                    error!("An unexpected error occurred: {e:?}")
                }
                _ => warn!("Analyze request rejected: {e}"),
            }
            Err(e.into())
        }
    }
}
