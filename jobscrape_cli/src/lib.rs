pub mod ai;
pub mod config;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod scraper;
pub mod utils;

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

pub use error::{ErrorPayload, ExtractionError};

/// The six fields pulled out of a job listing. Absent fields stay `None` and
/// serialize as `null`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct JobRecord {
    pub title: Option<String>,
    pub company: Option<String>,
    pub platform: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub pay: Option<String>,
}

impl JobRecord {
    pub const FIELDS: [&'static str; 6] =
        ["title", "company", "platform", "location", "job_type", "pay"];

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "title" => Some(&mut self.title),
            "company" => Some(&mut self.company),
            "platform" => Some(&mut self.platform),
            "location" => Some(&mut self.location),
            "job_type" => Some(&mut self.job_type),
            "pay" => Some(&mut self.pay),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ExtractionRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ExtractionRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn validate(&self) -> Result<Url, ExtractionError> {
        validate_url(&self.url)
    }
}

/// Checks that `raw` is a non-empty absolute http(s) URL.
pub fn validate_url(raw: &str) -> Result<Url, ExtractionError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ExtractionError::InvalidInput("Job URL is required.".into()));
    }

    let url = Url::parse(raw).map_err(|e| {
        ExtractionError::InvalidInput(format!("Job URL is not a valid absolute URL: {}", e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ExtractionError::InvalidInput(format!(
            "Job URL must use http or https, got {}",
            other
        ))),
    }
}
