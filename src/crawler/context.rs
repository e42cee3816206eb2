use crate::config::CrawlConfig;
use crate::crawler::{Fetcher, Frontier, ObserverRegistry};
use crate::state::{Counters, VisitedStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// State shared by the scheduler and every pipeline worker of one crawl
pub(crate) struct CrawlContext {
    pub config: CrawlConfig,

    /// Canonical start URL; base for relative links and the host filter
    pub start_url: Url,

    pub store: VisitedStore,
    pub frontier: Frontier,
    pub counters: Counters,
    pub observers: ObserverRegistry,
    pub fetcher: Arc<dyn Fetcher>,

    /// Cancelled once the crawl reaches a terminal state
    pub cancel: CancellationToken,
}

impl CrawlContext {
    pub fn new(
        config: CrawlConfig,
        start_url: Url,
        fetcher: Arc<dyn Fetcher>,
        observers: ObserverRegistry,
    ) -> Self {
        let frontier = Frontier::new(&config);
        Self {
            config,
            start_url,
            store: VisitedStore::new(),
            frontier,
            counters: Counters::new(),
            observers,
            fetcher,
            cancel: CancellationToken::new(),
        }
    }
}
