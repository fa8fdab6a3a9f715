use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use jobscrape_cli::JobRecord;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::job_link::{CreateJobPayload, JobLink};
use crate::models::user::{User, UserQuery, UserRef};
use crate::repository::{JobLinkStore, StoreError, UserStore};
use crate::state::AppState;

async fn acting_user(state: &AppState, user: Option<UserRef>) -> Result<User, StoreError> {
    let user = user.ok_or(StoreError::IdentifierRequired)?;
    UserStore::new(&state.pool).resolve(&user).await
}

/// GET /api/jobs?email=|user_id=
pub async fn list_jobs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> ApiResult<Json<Vec<JobLink>>> {
    // No identity or an unknown one lists nothing rather than failing.
    let user = match acting_user(&state, query.user_ref()).await {
        Ok(user) => user,
        Err(StoreError::IdentifierRequired | StoreError::UserNotFound) => {
            return Ok(Json(Vec::new()))
        }
        Err(e) => return Err(e.into()),
    };

    let links = JobLinkStore::new(&state.pool).list_for_user(&user).await?;
    Ok(Json(links))
}

/// POST /api/jobs
pub async fn create_job(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateJobPayload>,
) -> ApiResult<impl IntoResponse> {
    let user = acting_user(&state, UserRef::from_parts(payload.email, payload.user_id)).await?;
    let link = JobLinkStore::new(&state.pool)
        .create(&user, &payload.record)
        .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// GET /api/jobs/{id}?email=|user_id=
pub async fn get_job(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> ApiResult<Json<JobLink>> {
    let user = match acting_user(&state, query.user_ref()).await {
        Ok(user) => user,
        Err(StoreError::IdentifierRequired | StoreError::UserNotFound) => {
            return Err(StoreError::NotFound.into())
        }
        Err(e) => return Err(e.into()),
    };

    let link = JobLinkStore::new(&state.pool).get_for_user(id, &user).await?;
    Ok(Json(link))
}

/// PUT /api/jobs/{id}?email=|user_id=
pub async fn update_job(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<UserQuery>,
    ApiJson(record): ApiJson<JobRecord>,
) -> ApiResult<Json<JobLink>> {
    let user = acting_user(&state, query.user_ref()).await?;
    let link = JobLinkStore::new(&state.pool)
        .update(id, &user, &record)
        .await?;
    Ok(Json(link))
}

/// DELETE /api/jobs/{id}?email=|user_id=
pub async fn delete_job(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> ApiResult<StatusCode> {
    let user = acting_user(&state, query.user_ref()).await?;
    JobLinkStore::new(&state.pool).delete(id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
