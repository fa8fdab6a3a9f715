use crate::ai::{CompletionClient, GeminiClient};
use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::extractor::JobExtractor;
use crate::scraper::{PageFetcher, PageSource};
use crate::{ExtractionRequest, JobRecord};
use std::sync::Arc;
use tracing::info;

/// URL in, [`JobRecord`] out. Holds no per-request state, so one instance can
/// serve any number of concurrent calls.
pub struct JobPipeline {
    fetcher: Arc<dyn PageSource>,
    extractor: JobExtractor,
}

impl JobPipeline {
    pub fn new(fetcher: Arc<dyn PageSource>, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            fetcher,
            extractor: JobExtractor::new(client),
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self, reqwest::Error> {
        let fetcher = Arc::new(PageFetcher::new(config));
        let client = Arc::new(GeminiClient::new(config)?);
        Ok(Self::new(fetcher, client))
    }

    pub async fn run(&self, request: &ExtractionRequest) -> Result<JobRecord, ExtractionError> {
        let url = request.validate()?;
        info!("Extracting job listing from {}", url);

        let text = self.fetcher.fetch(url.as_str()).await?;
        self.extractor.extract(&text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StaticPage {
        text: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageSource for StaticPage {
        async fn fetch(&self, _url: &str) -> Result<String, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.clone())
        }
    }

    struct FailingPage;

    #[async_trait]
    impl PageSource for FailingPage {
        async fn fetch(&self, url: &str) -> Result<String, ExtractionError> {
            Err(ExtractionError::Fetch(format!("navigation to {} timed out after 60s", url)))
        }
    }

    #[derive(Default)]
    struct EchoModel {
        reply: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionClient for EchoModel {
        async fn generate(&self, _prompt: &str) -> Result<String, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_empty_url_touches_nothing() {
        let page = Arc::new(StaticPage::default());
        let model = Arc::new(EchoModel::default());
        let pipeline = JobPipeline::new(page.clone(), model.clone());

        let err = pipeline.run(&ExtractionRequest::new("")).await.unwrap_err();

        assert_eq!(err.to_string(), "Job URL is required.");
        assert_eq!(page.calls.load(Ordering::SeqCst), 0);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_fetches_then_extracts() {
        let page = Arc::new(StaticPage {
            text: "Platform Engineer - Globex - Remote".into(),
            ..Default::default()
        });
        let model = Arc::new(EchoModel {
            reply: "```json\n{\"title\":\"Platform Engineer\",\"company\":\"Globex\",\"job_type\":\"Remote\"}\n```".into(),
            ..Default::default()
        });
        let pipeline = JobPipeline::new(page.clone(), model.clone());

        let record = pipeline
            .run(&ExtractionRequest::new("https://jobs.example.com/42"))
            .await
            .unwrap();

        assert_eq!(record.title.as_deref(), Some("Platform Engineer"));
        assert_eq!(record.job_type.as_deref(), Some("Remote"));
        assert_eq!(record.pay, None);
        assert_eq!(page.calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_upstream() {
        let model = Arc::new(EchoModel::default());
        let pipeline = JobPipeline::new(Arc::new(FailingPage), model.clone());

        let err = pipeline
            .run(&ExtractionRequest::new("https://jobs.example.com/42"))
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::Fetch(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }
}
