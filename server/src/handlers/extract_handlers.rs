use axum::{extract::State, Json};
use jobscrape_cli::{ExtractionRequest, JobRecord};
use tracing::info;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

/// POST /api/fetch-job
///
/// Runs the whole fetch → prompt → parse pipeline inside the request. A
/// missing or empty `url` is rejected before any browser work starts.
pub async fn fetch_job_info(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ExtractionRequest>,
) -> ApiResult<Json<JobRecord>> {
    let record = state.pipeline.run(&payload).await?;
    info!("Extracted job record from {}", payload.url);
    Ok(Json(record))
}
