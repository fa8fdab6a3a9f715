use axum::{routing::post, Router};

use crate::handlers::auth_handlers::{login, logout, signup};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
