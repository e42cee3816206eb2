//! Fetch stage
//!
//! This module handles:
//! - The `Fetcher` capability and its `reqwest` implementation
//! - Building the HTTP client with the configured user agent and timeout
//! - The fetch workers: visit bookkeeping, observer notification and handing
//!   HTML bodies to the extraction stage

use crate::config::CrawlConfig;
use crate::crawler::context::CrawlContext;
use crate::crawler::pool::StageQueue;
use crate::crawler::scheduler::DispatchRequest;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use url::Url;

/// A response as seen by observers and the extraction stage
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Effective URL, after any redirects the client followed
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Creates a response with no headers and an empty body
    pub fn new(url: Url, status: StatusCode) -> Self {
        Self {
            url,
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Sets the `Content-Type` header; an invalid header value is ignored
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(content_type) {
            self.headers.insert(CONTENT_TYPE, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// The `Content-Type` header, if present and readable
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// True when the `Content-Type` header begins with `text/html`
    ///
    /// Parameters such as `; charset=utf-8` are allowed. The comparison is
    /// case-sensitive.
    pub fn is_html(&self) -> bool {
        self.content_type()
            .map_or(false, |content_type| content_type.starts_with("text/html"))
    }
}

/// Why a fetch produced no response
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build request for {url}: {message}")]
    Request { url: String, message: String },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

/// Issues a GET for one URL
///
/// Any response, whatever its status, is `Ok`. Only a failure to build or
/// complete the exchange is an error.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError>;
}

/// Builds an HTTP client with the crawl's user agent and request timeout
///
/// Redirects follow reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use ripple_walker::CrawlConfig;
/// use ripple_walker::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let classify = |e: reqwest::Error| {
            if e.is_builder() {
                FetchError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let response = self.client.get(url.clone()).send().await.map_err(classify)?;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let body = response.bytes().await.map_err(classify)?;

        Ok(FetchResponse {
            url: final_url,
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

/// HTML body on its way to the extraction stage
#[derive(Debug)]
pub(crate) struct HtmlPage {
    pub url: Url,
    pub body: Vec<u8>,
}

/// What a fetch worker did with one dispatch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchOutcome {
    /// The crawl was cancelled before or during the fetch
    Cancelled,
    /// The completed count was already past the budget
    OverBudget,
    /// Another worker already fetched this URL
    AlreadyVisited,
    /// The target could not be turned into a request
    InvalidTarget,
    /// The fetcher returned an error
    Failed,
    /// A response came back; `html` says whether it was forwarded
    Fetched { html: bool },
}

/// Runs one fetch worker until its queue closes
pub(crate) async fn fetch_worker(
    id: usize,
    ctx: Arc<CrawlContext>,
    jobs: StageQueue<DispatchRequest>,
    pages: mpsc::Sender<HtmlPage>,
) {
    tracing::trace!("Fetch worker {} started", id);

    while let Some(request) = jobs.recv().await {
        let outcome = handle_request(&ctx, request, &pages).await;
        tracing::trace!("Fetch worker {}: {:?}", id, outcome);
    }

    tracing::trace!("Fetch worker {} stopped", id);
}

/// Processes one dispatch request
///
/// Every path records exactly one completed unit of work. When the body is
/// forwarded, the pipeline gauge is raised before completion is recorded.
pub(crate) async fn handle_request(
    ctx: &CrawlContext,
    request: DispatchRequest,
    pages: &mpsc::Sender<HtmlPage>,
) -> FetchOutcome {
    let DispatchRequest {
        sequence_id,
        target,
    } = request;

    if ctx.cancel.is_cancelled() {
        ctx.counters.complete();
        return FetchOutcome::Cancelled;
    }

    if ctx.counters.completed() > ctx.config.max_requests {
        ctx.counters.complete();
        return FetchOutcome::OverBudget;
    }

    if !ctx.store.mark_visited(&target) {
        tracing::debug!("Skipping already visited URL: {}", target);
        ctx.counters.complete();
        return FetchOutcome::AlreadyVisited;
    }

    let url = match Url::parse(&target) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot build request for {}: {}", target, e);
            ctx.counters.complete();
            return FetchOutcome::InvalidTarget;
        }
    };

    tracing::debug!("Fetching #{}: {}", sequence_id, url);

    let result = tokio::select! {
        biased;
        _ = ctx.cancel.cancelled() => {
            tracing::debug!("Abandoning in-flight fetch of {}", url);
            ctx.counters.complete();
            return FetchOutcome::Cancelled;
        }
        result = ctx.fetcher.fetch(&url) => result,
    };

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Fetch failed: {}", e);
            ctx.counters.complete();
            return FetchOutcome::Failed;
        }
    };

    ctx.observers.notify_visited(&response);

    let html = response.is_html();
    if html {
        ctx.counters.enter_pipeline();
    }
    ctx.counters.complete();

    if !html {
        tracing::debug!(
            "Not extracting links from {} ({})",
            response.url,
            response.content_type().unwrap_or("no content type")
        );
        return FetchOutcome::Fetched { html: false };
    }

    let page = HtmlPage {
        url: response.url,
        body: response.body,
    };
    if pages.send(page).await.is_err() {
        tracing::debug!("Extraction stage closed, dropping body");
        ctx.counters.leave_pipeline();
    }

    FetchOutcome::Fetched { html: true }
}
