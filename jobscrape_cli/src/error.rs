use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way a single extraction can fail. Each request fails on its own;
/// none of these are fatal to the process.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Missing or malformed job URL. Raised before any browser or network work.
    #[error("{0}")]
    InvalidInput(String),

    /// Browser launch, navigation, timeout or text read failed.
    #[error("Failed to fetch job page: {0}")]
    Fetch(String),

    /// The LLM provider gave no usable completion.
    #[error("Gemini returned no usable completion: {message}")]
    Upstream {
        message: String,
        raw: Option<String>,
    },

    /// The completion was not a JSON object after fence stripping.
    #[error("Failed to parse Gemini output: {details}")]
    Parse { details: String, raw: String },
}

impl ExtractionError {
    pub fn fetch(cause: impl std::fmt::Display) -> Self {
        Self::Fetch(cause.to_string())
    }

    pub fn upstream(message: impl Into<String>, raw: Option<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            raw,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Fetch(_) => "fetch_failure",
            Self::Upstream { .. } => "upstream_failure",
            Self::Parse { .. } => "parse_failure",
        }
    }
}

/// Wire shape of a failed extraction: `{error, [details], [raw]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl From<&ExtractionError> for ErrorPayload {
    fn from(err: &ExtractionError) -> Self {
        match err {
            ExtractionError::InvalidInput(msg) => ErrorPayload {
                error: msg.clone(),
                details: None,
                raw: None,
            },
            ExtractionError::Fetch(cause) => ErrorPayload {
                error: "Failed to fetch job page".into(),
                details: Some(cause.clone()),
                raw: None,
            },
            ExtractionError::Upstream { message, raw } => ErrorPayload {
                error: "Gemini returned no usable completion".into(),
                details: Some(message.clone()),
                raw: raw.clone(),
            },
            ExtractionError::Parse { details, raw } => ErrorPayload {
                error: "Failed to parse Gemini output".into(),
                details: Some(details.clone()),
                raw: Some(raw.clone()),
            },
        }
    }
}

impl From<ExtractionError> for ErrorPayload {
    fn from(err: ExtractionError) -> Self {
        ErrorPayload::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invalid_input_payload_has_only_error() {
        let payload = ErrorPayload::from(ExtractionError::InvalidInput(
            "Job URL is required.".into(),
        ));
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "error": "Job URL is required." })
        );
    }

    #[test]
    fn parse_payload_carries_raw_text() {
        let err = ExtractionError::Parse {
            details: "expected value at line 1 column 1".into(),
            raw: "not json at all".into(),
        };
        let value = serde_json::to_value(ErrorPayload::from(&err)).unwrap();
        assert_eq!(value["error"], "Failed to parse Gemini output");
        assert_eq!(value["raw"], "not json at all");
        assert!(value["details"].is_string());
        assert_eq!(err.kind(), "parse_failure");
    }

    #[test]
    fn upstream_payload_omits_missing_raw() {
        let value =
            serde_json::to_value(ErrorPayload::from(ExtractionError::upstream("timed out", None)))
                .unwrap();
        assert!(value.get("raw").is_none());
        assert_eq!(value["details"], "timed out");
    }
}
