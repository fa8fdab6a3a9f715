use jobscrape_cli::config::{ConfigError, ExtractorConfig};
use std::env;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Origin allowed by CORS (the browser front end).
    pub client_url: String,
    pub jwt_secret: String,
    pub extractor: ExtractorConfig,
}

impl ServerConfig {
    /// Required: JWT_SECRET, GEMINI_API_KEY.
    /// Optional: DATABASE_URL, BIND_ADDR, CLIENT_URL and the extractor settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            database_url: non_empty("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:jobscrape.db?mode=rwc".to_string()),
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string()),
            client_url: non_empty("CLIENT_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            jwt_secret,
            extractor: ExtractorConfig::from_lookup(&lookup)?,
        })
    }
}
