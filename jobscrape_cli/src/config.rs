use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in .env file or environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for the fetch → prompt → parse pipeline.
#[derive(Clone, Debug)]
pub struct ExtractorConfig {
    /// Pre-shared key sent as the `key` query parameter.
    pub gemini_api_key: String,
    pub gemini_model: String,
    /// Scheme and host of the generation API, without a trailing slash.
    pub gemini_api_base: String,
    pub upstream_timeout: Duration,
    pub navigation_timeout: Duration,
    /// Chromium binary to launch; auto-detected when `None`.
    pub chrome_executable: Option<PathBuf>,
}

impl ExtractorConfig {
    pub fn new(gemini_api_key: impl Into<String>) -> Self {
        Self {
            gemini_api_key: gemini_api_key.into(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            navigation_timeout: Duration::from_secs(DEFAULT_NAVIGATION_TIMEOUT_SECS),
            chrome_executable: None,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Required:
    /// - GEMINI_API_KEY
    ///
    /// Optional:
    /// - GEMINI_MODEL (default: gemini-2.0-flash)
    /// - GEMINI_API_BASE (default: https://generativelanguage.googleapis.com)
    /// - GEMINI_TIMEOUT_SECS (default: 30)
    /// - NAVIGATION_TIMEOUT_SECS (default: 60)
    /// - CHROME_EXECUTABLE
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let mut config = Self::new(gemini_api_key);

        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            config.gemini_model = model;
        }
        if let Some(base) = lookup("GEMINI_API_BASE").filter(|b| !b.trim().is_empty()) {
            config.gemini_api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(secs) = parse_secs(&lookup, "GEMINI_TIMEOUT_SECS")? {
            config.upstream_timeout = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "NAVIGATION_TIMEOUT_SECS")? {
            config.navigation_timeout = secs;
        }
        config.chrome_executable = lookup("CHROME_EXECUTABLE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}

fn parse_secs<F>(lookup: &F, name: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
            _ => Err(ConfigError::Invalid { name, value }),
        },
    }
}
