use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

/// A text-completion backend: prompt in, generated text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ExtractionError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &ExtractorConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.upstream_timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.gemini_api_base, config.gemini_model
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ExtractionError> {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!("Sending {} prompt chars to {}", prompt.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                // The request URL carries the API key.
                let e = e.without_url();
                error!("Gemini request failed: {}", e);
                ExtractionError::upstream(format!("request to Gemini failed: {}", e), None)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            ExtractionError::upstream(format!("failed to read Gemini response: {}", e), None)
        })?;

        if !status.is_success() {
            error!("Gemini API error {}: {}", status, body);
            return Err(ExtractionError::upstream(
                format!("Gemini API returned {}", status),
                Some(body),
            ));
        }

        let envelope: Value = serde_json::from_str(&body).map_err(|e| {
            ExtractionError::upstream(format!("Gemini response is not JSON: {}", e), Some(body.clone()))
        })?;

        match completion_text(&envelope) {
            Some(text) => {
                info!("Received {} completion chars from Gemini", text.len());
                Ok(text.to_string())
            }
            None => {
                error!("Gemini response carried no completion");
                Err(ExtractionError::upstream(
                    "response did not contain a completion",
                    Some(body),
                ))
            }
        }
    }
}

/// `candidates[0].content.parts[0].text` of a generateContent envelope.
pub fn completion_text(envelope: &Value) -> Option<&str> {
    envelope
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorPayload;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;
    use tokio::net::TcpListener;

    const PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn client_for(server: &mockito::Server) -> GeminiClient {
        let mut config = ExtractorConfig::new("test-key");
        config.gemini_api_base = server.url();
        config.upstream_timeout = Duration::from_secs(5);
        GeminiClient::new(&config).unwrap()
    }

    #[test]
    fn completion_text_reads_first_part() {
        let envelope = json!({
            "candidates": [{ "content": { "parts": [{ "text": "hello" }, { "text": "ignored" }] } }]
        });
        assert_eq!(completion_text(&envelope), Some("hello"));
        assert_eq!(completion_text(&json!({ "candidates": [] })), None);
        assert_eq!(completion_text(&json!({ "error": { "code": 429 } })), None);
    }

    #[tokio::test]
    async fn test_generate_returns_completion_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::Json(json!({
                "contents": [{ "parts": [{ "text": "extract this" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{ "content": { "parts": [{ "text": "{\"title\":\"Dev\"}" }] } }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = client_for(&server).generate("extract this").await.unwrap();
        assert_eq!(text, "{\"title\":\"Dev\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_without_candidates_is_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
        let _mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body.clone())
            .create_async()
            .await;

        let err = client_for(&server).generate("prompt").await.unwrap_err();
        match err {
            ExtractionError::Upstream { raw, .. } => assert_eq!(raw, Some(body)),
            other => panic!("expected upstream failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_error_status_is_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("{\"error\":{\"message\":\"quota exceeded\"}}")
            .create_async()
            .await;

        let err = client_for(&server).generate("prompt").await.unwrap_err();
        match err {
            ExtractionError::Upstream { message, raw } => {
                assert!(message.contains("429"));
                assert!(raw.unwrap().contains("quota exceeded"));
            }
            other => panic!("expected upstream failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_non_json_envelope_is_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = client_for(&server).generate("prompt").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Upstream { raw: Some(_), .. }));
    }

    #[tokio::test]
    async fn test_generate_timeout_is_upstream_failure_without_key() {
        // Accepts connections and never answers.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let mut config = ExtractorConfig::new("secret-gemini-key");
        config.gemini_api_base = format!("http://{}", addr);
        config.upstream_timeout = Duration::from_millis(500);
        let client = GeminiClient::new(&config).unwrap();

        let err = client.generate("prompt").await.unwrap_err();
        match &err {
            ExtractionError::Upstream { message, raw } => {
                assert!(raw.is_none());
                assert!(!message.contains("secret-gemini-key"), "{}", message);
            }
            other => panic!("expected upstream failure, got {:?}", other),
        }

        let payload = serde_json::to_string(&ErrorPayload::from(&err)).unwrap();
        assert!(!payload.contains("secret-gemini-key"));
        assert!(!err.to_string().contains("secret-gemini-key"));
    }
}
