use crate::config::CrawlConfig;
use crate::crawler::context::CrawlContext;
use crate::crawler::{FetchError, FetchResponse, Fetcher, ObserverRegistry};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub(crate) const TEST_START_URL: &str = "https://test.com/";

/// In-memory fetcher; unknown URLs fail like a refused connection
#[derive(Default)]
pub(crate) struct StubFetcher {
    responses: HashMap<String, FetchResponse>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_html(self, url: &str, body: &str) -> Self {
        let response = FetchResponse::new(Url::parse(url).unwrap(), StatusCode::OK)
            .with_content_type("text/html; charset=utf-8")
            .with_body(body);
        self.with_response(response)
    }

    pub fn with_response(mut self, response: FetchResponse) -> Self {
        self.responses.insert(response.url.to_string(), response);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Transport {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

pub(crate) fn test_context(config: CrawlConfig, fetcher: Arc<dyn Fetcher>) -> Arc<CrawlContext> {
    test_context_with_observers(config, fetcher, ObserverRegistry::new())
}

pub(crate) fn test_context_with_observers(
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    observers: ObserverRegistry,
) -> Arc<CrawlContext> {
    Arc::new(CrawlContext::new(
        config,
        Url::parse(TEST_START_URL).unwrap(),
        fetcher,
        observers,
    ))
}
