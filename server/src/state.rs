use jobscrape_cli::pipeline::JobPipeline;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub pipeline: Arc<JobPipeline>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(pool: SqlitePool, pipeline: JobPipeline, jwt_secret: &str) -> Self {
        AppState {
            pool,
            pipeline: Arc::new(pipeline),
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}
