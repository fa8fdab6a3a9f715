use crate::ai::CompletionClient;
use crate::error::ExtractionError;
use crate::JobRecord;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

const PROMPT_TEMPLATE: &str = r#"Extract the following information from this job listing text:
- Job Title
- Company Name
- Platform (e.g. LinkedIn, Indeed)
- Location (e.g. United States, Remote)
- Job Type (e.g. Remote, On-site, Hybrid)
- Pay (range or single value, like "$60,000 - $80,000"; if no amount is found, put Undisclosed)

Format the result as a single JSON object with exactly these keys:
{
    "title": "...",
    "company": "...",
    "platform": "...",
    "location": "...",
    "job_type": "...",
    "pay": "..."
}

Text:
"#;

/// Turns visible page text into a [`JobRecord`] with one completion call.
pub struct JobExtractor {
    client: Arc<dyn CompletionClient>,
}

impl JobExtractor {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn extract(&self, text: &str) -> Result<JobRecord, ExtractionError> {
        let prompt = build_prompt(text);

        debug!("Awaiting upstream completion");
        let completion = self.client.generate(&prompt).await.map_err(|e| {
            warn!("Extraction ended in upstream failure: {}", e);
            e
        })?;

        match parse_completion(&completion) {
            Ok(record) => {
                info!(
                    "Extracted job: {} at {}",
                    record.title.as_deref().unwrap_or("?"),
                    record.company.as_deref().unwrap_or("?")
                );
                Ok(record)
            }
            Err(e) => {
                warn!("Extraction ended in parse failure: {}", e);
                Err(e)
            }
        }
    }
}

pub fn build_prompt(text: &str) -> String {
    let mut prompt = String::with_capacity(PROMPT_TEMPLATE.len() + text.len());
    prompt.push_str(PROMPT_TEMPLATE);
    prompt.push_str(text);
    prompt
}

/// Drops every "```json" and "```" marker, then trims.
pub fn strip_code_fences(completion: &str) -> String {
    completion
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

pub fn parse_completion(completion: &str) -> Result<JobRecord, ExtractionError> {
    let cleaned = strip_code_fences(completion);

    let parsed: Value = match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(e) => {
            return Err(ExtractionError::Parse {
                details: e.to_string(),
                raw: cleaned,
            })
        }
    };

    match parsed {
        Value::Object(map) => Ok(project_record(&map)),
        other => Err(ExtractionError::Parse {
            details: format!("expected a JSON object, got {}", json_kind(&other)),
            raw: cleaned,
        }),
    }
}

/// Keeps the six record keys and nothing else. Non-string values are kept as
/// their JSON text; `null` stays absent.
pub fn project_record(map: &Map<String, Value>) -> JobRecord {
    let mut record = JobRecord::default();
    for name in JobRecord::FIELDS {
        let value = match map.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        if let Some(slot) = record.field_mut(name) {
            *slot = value;
        }
    }
    record
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct CannedClient {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedClient {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for CannedClient {
        async fn generate(&self, prompt: &str) -> Result<String, ExtractionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(|raw| ExtractionError::upstream("no candidates", Some(raw)))
        }
    }

    #[test]
    fn prompt_lists_fields_and_appends_text_verbatim() {
        let prompt = build_prompt("Senior Rust Developer\n  Acme Corp ");
        for key in JobRecord::FIELDS {
            assert!(prompt.contains(&format!("\"{}\"", key)), "prompt lacks {}", key);
        }
        assert!(prompt.ends_with("Text:\nSenior Rust Developer\n  Acme Corp "));
    }

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fences("{}"), "{}");
    }

    #[test]
    fn fenced_completion_with_missing_fields_becomes_nulls() {
        let record = parse_completion(
            "```json\n{\"title\":\"Backend Engineer\",\"company\":\"Acme\",\"platform\":\"LinkedIn\"}\n```",
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "title": "Backend Engineer",
                "company": "Acme",
                "platform": "LinkedIn",
                "location": null,
                "job_type": null,
                "pay": null
            })
        );
    }

    #[test]
    fn extra_keys_are_discarded() {
        let record = parse_completion(
            r#"{"title":"SRE","description":"long text","salary_currency":"USD","pay":"Undisclosed"}"#,
        )
        .unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 6);
        assert!(value.get("description").is_none());
        assert_eq!(record.pay.as_deref(), Some("Undisclosed"));
    }

    #[test]
    fn empty_string_values_are_kept_not_nulled() {
        let record = parse_completion(r#"{"title":"","location":null}"#).unwrap();
        assert_eq!(record.title.as_deref(), Some(""));
        assert_eq!(record.location, None);
    }

    #[test]
    fn non_string_values_keep_their_json_text() {
        let record = parse_completion(r#"{"pay":85000,"job_type":["Remote","Hybrid"]}"#).unwrap();
        assert_eq!(record.pay.as_deref(), Some("85000"));
        assert_eq!(record.job_type.as_deref(), Some("[\"Remote\",\"Hybrid\"]"));
    }

    #[test]
    fn non_json_is_parse_failure_with_raw() {
        match parse_completion("not json at all").unwrap_err() {
            ExtractionError::Parse { raw, .. } => assert_eq!(raw, "not json at all"),
            other => panic!("expected parse failure, got {:?}", other),
        }
    }

    #[test]
    fn raw_is_the_cleaned_text() {
        match parse_completion("```json\nSorry, I can't help with that.\n```").unwrap_err() {
            ExtractionError::Parse { raw, .. } => {
                assert_eq!(raw, "Sorry, I can't help with that.")
            }
            other => panic!("expected parse failure, got {:?}", other),
        }
    }

    #[test]
    fn json_array_is_parse_failure() {
        assert!(matches!(
            parse_completion(r#"[{"title":"Dev"}]"#),
            Err(ExtractionError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_extract_makes_one_call_with_prompt() {
        let client = CannedClient::ok("```json\n{\"title\":\"Data Engineer\",\"company\":\"Initech\"}\n```");
        let extractor = JobExtractor::new(client.clone());

        let record = extractor.extract("Data Engineer at Initech").await.unwrap();

        assert_eq!(record.title.as_deref(), Some("Data Engineer"));
        assert_eq!(record.company.as_deref(), Some("Initech"));
        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].ends_with("Data Engineer at Initech"));
    }

    #[tokio::test]
    async fn test_extract_propagates_upstream_failure() {
        let client = Arc::new(CannedClient {
            reply: Err("{\"error\":{\"code\":429}}".into()),
            prompts: Mutex::new(Vec::new()),
        });
        let extractor = JobExtractor::new(client.clone());

        let err = extractor.extract("anything").await.unwrap_err();

        assert!(matches!(err, ExtractionError::Upstream { raw: Some(_), .. }));
        assert_eq!(client.prompts.lock().unwrap().len(), 1);
    }
}
