pub mod auth;
pub mod jobs;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::auth_handlers::me;
use crate::middleware::auth_middleware::auth_middleware;
use crate::state::AppState;
use auth::auth_routes;
use jobs::job_routes;

/// Every route, without CORS (added by `main` from config).
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/me", get(me))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/auth", auth_routes())
        .nest("/api", protected.merge(job_routes()))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
