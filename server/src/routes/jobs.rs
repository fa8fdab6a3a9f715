use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::extract_handlers::fetch_job_info;
use crate::handlers::job_handlers::{create_job, delete_job, get_job, list_jobs, update_job};
use crate::state::AppState;

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/fetch-job", post(fetch_job_info))
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/{id}", get(get_job).put(update_job).delete(delete_job))
}
