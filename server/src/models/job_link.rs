use chrono::{DateTime, Utc};
use jobscrape_cli::JobRecord;
use serde::{Deserialize, Serialize};

/// A saved [`JobRecord`] and the user who owns it.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow, PartialEq, Eq)]
pub struct JobLink {
    pub id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub company: Option<String>,
    pub platform: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub pay: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/jobs`: the owner plus the six record fields.
#[derive(Debug, Deserialize)]
pub struct CreateJobPayload {
    pub email: Option<String>,
    pub user_id: Option<i64>,
    #[serde(flatten)]
    pub record: JobRecord,
}
