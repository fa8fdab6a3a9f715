use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jobscrape_cli::{ErrorPayload, ExtractionError};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::repository::StoreError;

/// A status code plus a JSON body; what every handler returns on failure.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::IdentifierRequired
            | StoreError::UserNotFound
            | StoreError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            StoreError::EmailTaken | StoreError::Duplicate => StatusCode::BAD_REQUEST,
            StoreError::NotFound => StatusCode::NOT_FOUND,
            StoreError::Database(e) => {
                error!("Database error: {}", e);
                return ApiError::internal("Database error");
            }
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        let status = match &err {
            ExtractionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ExtractionError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ExtractionError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ExtractionError::Parse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        warn!("Job extraction failed ({}): {}", err.kind(), err);

        let body = serde_json::to_value(ErrorPayload::from(&err))
            .unwrap_or_else(|_| json!({ "error": err.to_string() }));
        ApiError { status, body }
    }
}
