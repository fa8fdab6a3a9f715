use axum::{
    extract::{Json, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::jwt::{generate_token, TOKEN_COOKIE, TOKEN_TTL_SECS};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::models::user::User;
use crate::repository::UserStore;
use crate::state::AppState;

const BCRYPT_COST: u32 = 10;
const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 68;

#[derive(Deserialize)]
pub struct SignupPayload {
    pub email: String,
    pub password: String,
    pub password2: String,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

impl SignupPayload {
    fn validate(&self) -> Result<(), ApiError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::bad_request("Enter a valid email address."));
        }
        let len = self.password.chars().count();
        if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
            return Err(ApiError::bad_request(format!(
                "Password must be between {} and {} characters.",
                MIN_PASSWORD_LEN, MAX_PASSWORD_LEN
            )));
        }
        if self.password != self.password2 {
            return Err(ApiError::bad_request("passwords do not match"));
        }
        Ok(())
    }
}

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupPayload>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;

    let password = payload.password;
    let hashed_password = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| {
            error!("Hashing task failed: {}", e);
            ApiError::internal("Hashing error")
        })?
        .map_err(|e| {
            error!("Hashing failed: {}", e);
            ApiError::internal("Hashing error")
        })?;

    let user = UserStore::new(&state.pool)
        .create(payload.email.trim(), &hashed_password)
        .await?;
    info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "email": user.email,
            "id": user.id,
            "message": "Registration successful."
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> ApiResult<Response> {
    let invalid = || ApiError::unauthorized("invalid credential try again");

    let (user, hash) = UserStore::new(&state.pool)
        .credentials(payload.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password = payload.password;
    let is_valid_password = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|_| ApiError::internal("Hashing error"))?
        .map_err(|_| invalid())?;

    if !is_valid_password {
        return Err(invalid());
    }

    let token = generate_token(user.id, &user.email, &state.jwt_secret).map_err(|e| {
        error!("Token generation failed: {}", e);
        ApiError::internal("Token error")
    })?;

    let cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}",
        TOKEN_COOKIE, token, TOKEN_TTL_SECS
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|_| ApiError::internal("Token error"))?,
    );

    info!("User {} logged in", user.id);
    let body = Json(json!({ "email": user.email, "id": user.id }));
    Ok((headers, body).into_response())
}

pub async fn me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

pub async fn logout() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_static("jobtoken=; HttpOnly; Path=/; Max-Age=0"),
    );

    (headers, Json(json!({ "message": "logged out successfully" })))
}
