mod config;
mod db;
mod error;
mod extract;
mod handlers;
mod middleware;
mod models;
mod repository;
mod routes;
mod state;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use jobscrape_cli::pipeline::JobPipeline;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let pool = db::init_db(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    info!("Database ready: {}", config.database_url);

    let pipeline = JobPipeline::from_config(&config.extractor)?;
    let state = AppState::new(pool, pipeline, &config.jwt_secret);

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .client_url
                .parse::<HeaderValue>()
                .context("CLIENT_URL is not a valid origin")?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::COOKIE])
        .allow_credentials(true);

    let app = routes::app(state).layer(cors);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
