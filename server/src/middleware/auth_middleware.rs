use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;
use tower_cookies::Cookies;
use tracing::debug;

use crate::error::ApiError;
use crate::handlers::jwt::{verify_token, TOKEN_COOKIE};
use crate::repository::UserStore;
use crate::state::AppState;

/// Resolves the `jobtoken` cookie to a [`User`](crate::models::user::User)
/// extension, or answers 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let cookies = match req.extensions().get::<Cookies>() {
        Some(c) => c.clone(),
        None => return ApiError::unauthorized("Cookie manager missing").into_response(),
    };

    let token = match cookies.get(TOKEN_COOKIE) {
        Some(c) => c.value().to_string(),
        None => return ApiError::unauthorized("Token not found").into_response(),
    };

    let data = match verify_token(&token, &state.jwt_secret) {
        Ok(d) => d,
        Err(e) => {
            let msg = match *e.kind() {
                ErrorKind::ExpiredSignature => "Token expired",
                _ => "Invalid token",
            };
            debug!("Rejected token: {}", e);
            return ApiError::unauthorized(msg).into_response();
        }
    };

    let user_id = match data.claims.sub.parse::<i64>() {
        Ok(id) => id,
        Err(_) => return ApiError::unauthorized("Invalid token subject").into_response(),
    };

    let user = match UserStore::new(&state.pool).find_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return ApiError::unauthorized("User not found").into_response(),
        Err(e) => return ApiError::from(e).into_response(),
    };

    req.extensions_mut().insert(user);
    next.run(req).await
}
