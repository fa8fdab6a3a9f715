use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::validate_url;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// Something that can turn a job URL into the page's visible text.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ExtractionError>;
}

/// Loads a page in a fresh headless Chromium and returns the rendered body text.
/// Nothing is shared between calls; every fetch launches and tears down its own browser.
pub struct PageFetcher {
    navigation_timeout: Duration,
    chrome_executable: Option<PathBuf>,
}

impl PageFetcher {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            navigation_timeout: config.navigation_timeout,
            chrome_executable: config.chrome_executable.clone(),
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, ExtractionError> {
        let mut builder = BrowserConfig::builder().request_timeout(self.navigation_timeout);
        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        builder
            .build()
            .map_err(|e| ExtractionError::Fetch(format!("invalid browser configuration: {}", e)))
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ExtractionError> {
        let url = validate_url(url)?;
        let config = self.browser_config()?;

        info!("🔍 Loading job page: {}", url);
        let session = BrowserSession::launch(config).await?;
        let result = session.visible_text(&url, self.navigation_timeout).await;
        session.close().await;

        match &result {
            Ok(text) => info!("Read {} chars of visible text from {}", text.len(), url),
            Err(e) => warn!("Fetching {} failed: {}", url, e),
        }
        result
    }
}

/// One launched browser plus the task driving its CDP connection.
///
/// `close` is the normal path. If the session is dropped without it (the
/// future was cancelled or something panicked) the close is spawned on the
/// runtime instead, so the Chromium process never outlives the call.
struct BrowserSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    runtime: tokio::runtime::Handle,
}

impl BrowserSession {
    async fn launch(config: BrowserConfig) -> Result<Self, ExtractionError> {
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ExtractionError::Fetch(format!("failed to launch browser: {}", e)))?;

        let handler = tokio::spawn(async move {
            while handler.next().await.is_some() {}
        });

        Ok(Self {
            browser: Some(browser),
            handler: Some(handler),
            runtime: tokio::runtime::Handle::current(),
        })
    }

    async fn visible_text(&self, url: &Url, timeout: Duration) -> Result<String, ExtractionError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ExtractionError::fetch("browser already closed"))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ExtractionError::Fetch(format!("failed to open page: {}", e)))?;

        match tokio::time::timeout(timeout, page.goto(url.as_str())).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(ExtractionError::Fetch(format!("navigation to {} failed: {}", url, e)))
            }
            Err(_) => {
                return Err(ExtractionError::Fetch(format!(
                    "navigation to {} timed out after {}s",
                    url,
                    timeout.as_secs()
                )))
            }
        }

        let body = page
            .find_element("body")
            .await
            .map_err(|e| ExtractionError::Fetch(format!("page has no readable body: {}", e)))?;
        let text = body
            .inner_text()
            .await
            .map_err(|e| ExtractionError::Fetch(format!("failed to read body text: {}", e)))?
            .unwrap_or_default();

        if let Err(e) = page.close().await {
            debug!("Page close failed for {}: {}", url, e);
        }

        Ok(text)
    }

    async fn close(mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Browser close failed: {}", e);
            }
            if let Err(e) = browser.wait().await {
                warn!("Waiting for browser exit failed: {}", e);
            }
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let browser = self.browser.take();
        let handler = self.handler.take();
        if browser.is_none() && handler.is_none() {
            return;
        }

        self.runtime.spawn(async move {
            if let Some(mut browser) = browser {
                if let Err(e) = browser.close().await {
                    warn!("Deferred browser close failed: {}", e);
                }
                let _ = browser.wait().await;
            }
            if let Some(handler) = handler {
                handler.abort();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> PageFetcher {
        let mut config = ExtractorConfig::new("unused");
        config.chrome_executable = Some(PathBuf::from("/nonexistent/chromium"));
        PageFetcher::new(&config)
    }

    #[tokio::test]
    async fn test_empty_url_fails_before_launch() {
        let err = fetcher().fetch("").await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidInput(ref m) if m == "Job URL is required."));
    }

    #[tokio::test]
    async fn test_malformed_url_fails_before_launch() {
        let err = fetcher().fetch("not a url").await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_browser_is_fetch_failure() {
        let err = fetcher().fetch("https://example.com/jobs/1").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Fetch(_)));
    }
}
