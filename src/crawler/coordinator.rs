//! Crawler coordinator - main crawl orchestration logic
//!
//! This module wires one crawl together:
//! - Spawning the fetch, extraction and filter worker pools
//! - Seeding the frontier with the start URL
//! - Racing the scheduler against the crawl deadline
//! - Waiting for every worker before reporting the summary

use crate::config::{validate_crawl_config, CrawlConfig};
use crate::crawler::context::CrawlContext;
use crate::crawler::fetcher::{fetch_worker, HtmlPage};
use crate::crawler::filter::filter_worker;
use crate::crawler::parser::extract_worker;
use crate::crawler::pool::stage_queue;
use crate::crawler::scheduler::{DispatchRequest, Scheduler};
use crate::crawler::{Fetcher, HttpFetcher, ObserverRegistry, VisitObserver};
use crate::output::{CrawlOutcome, CrawlSummary};
use crate::url::parse_start_url;
use crate::{CrawlError, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;

/// A configured crawler
///
/// Register observers with [`Crawler::on_visited`], then call
/// [`Crawler::crawl`]. Each `crawl` call starts from empty state, so one
/// crawler can run several crawls one after another.
///
/// # Example
///
/// ```no_run
/// use ripple_walker::{CrawlConfig, Crawler, FetchResponse};
///
/// # async fn example() -> ripple_walker::Result<()> {
/// let mut crawler = Crawler::new(CrawlConfig::default())?;
/// crawler.on_visited(|response: &FetchResponse| println!("{}", response.url));
///
/// let summary = crawler.crawl("https://example.com").await?;
/// println!("{}", summary.outcome);
/// # Ok(())
/// # }
/// ```
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    observers: ObserverRegistry,
}

impl Crawler {
    /// Creates a crawler that fetches over HTTP
    ///
    /// # Errors
    ///
    /// * `CrawlError::Config` - The configuration is invalid
    /// * `CrawlError::Reqwest` - The HTTP client could not be built
    pub fn new(config: CrawlConfig) -> Result<Self> {
        validate_crawl_config(&config)?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Creates a crawler with a custom fetch capability
    pub fn with_fetcher(config: CrawlConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            fetcher,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Registers an observer for every fetched response
    ///
    /// Observers are called in registration order.
    pub fn on_visited<O>(&mut self, observer: O) -> &mut Self
    where
        O: VisitObserver + 'static,
    {
        self.observers.register(Arc::new(observer));
        self
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Crawls the site reachable from `start_url`
    ///
    /// Returns once the crawl reached a terminal state and every worker has
    /// stopped. Per-URL failures never fail the crawl.
    ///
    /// # Errors
    ///
    /// * `CrawlError::InvalidStartUrl` - `start_url` is not absolute or has no
    ///   host; no request is made
    /// * `CrawlError::Config` - The configuration is invalid
    pub async fn crawl(&self, start_url: &str) -> Result<CrawlSummary> {
        let start = parse_start_url(start_url).map_err(|e| CrawlError::InvalidStartUrl {
            url: start_url.to_string(),
            reason: e.to_string(),
        })?;
        validate_crawl_config(&self.config)?;

        let started_at = Utc::now();
        let seed = start.to_string();
        tracing::info!(
            "Starting crawl of {} (budget {}, delay {}ms, timeout {}ms, {} workers per stage)",
            seed,
            self.config.max_requests,
            self.config.politeness_delay,
            self.config.timeout,
            self.config.workers
        );

        let ctx = Arc::new(CrawlContext::new(
            self.config.clone(),
            start,
            Arc::clone(&self.fetcher),
            self.observers.clone(),
        ));

        let workers = self.config.workers;
        let (jobs_tx, jobs) = stage_queue::<DispatchRequest>(workers);
        let (pages_tx, pages) = stage_queue::<HtmlPage>(workers);
        let (links_tx, links) = stage_queue::<String>(workers);

        let mut tasks = JoinSet::new();
        for id in 0..workers {
            tasks.spawn(fetch_worker(id, ctx.clone(), jobs.clone(), pages_tx.clone()));
            tasks.spawn(extract_worker(id, ctx.clone(), pages.clone(), links_tx.clone()));
            tasks.spawn(filter_worker(id, ctx.clone(), links.clone()));
        }
        // Each stage closes once the workers feeding it are gone
        drop(pages_tx);
        drop(links_tx);

        ctx.store.try_claim(&seed);
        ctx.frontier.push(seed.clone());

        let scheduler = Scheduler::new(ctx.clone(), jobs_tx);
        let outcome = tokio::select! {
            outcome = scheduler.run() => outcome,
            _ = tokio::time::sleep(self.config.timeout()) => {
                tracing::info!("Crawl deadline of {}ms expired", self.config.timeout);
                CrawlOutcome::DeadlineExpired
            }
        };
        ctx.cancel.cancel();

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task failed: {}", e);
            }
        }

        let summary = CrawlSummary {
            start_url: seed,
            outcome,
            dispatched: ctx.counters.dispatched(),
            completed: ctx.counters.completed(),
            urls_known: ctx.store.len(),
            urls_visited: ctx.store.visited_count(),
            frontier_remaining: ctx.frontier.len(),
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl ended ({}): {} URLs visited, {} known, in {}ms",
            summary.outcome,
            summary.urls_visited,
            summary.urls_known,
            summary.duration().num_milliseconds()
        );

        Ok(summary)
    }
}
