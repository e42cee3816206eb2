use serde::Deserialize;
use std::time::Duration;

/// Default upper bound on fetch attempts for one crawl
pub const DEFAULT_MAX_REQUESTS: u64 = 1_000_000;

/// Default spacing between dispatches (milliseconds)
pub const DEFAULT_POLITENESS_DELAY: u64 = 100;

/// Default wall-clock deadline for one crawl (milliseconds)
pub const DEFAULT_TIMEOUT: u64 = 10_000_000;

/// Default number of workers in each pipeline stage
pub const DEFAULT_WORKERS: usize = 100;

/// Default per-request HTTP client timeout (milliseconds)
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 2_000;

/// Main configuration structure for Ripple-Walker
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// URL the crawl starts from; its host bounds the crawl
    #[serde(rename = "start-url", default)]
    pub start_url: String,

    #[serde(default)]
    pub crawler: CrawlConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Upper bound on total fetch attempts for the whole crawl
    pub max_requests: u64,

    /// Minimum time between two dispatches (milliseconds)
    pub politeness_delay: u64,

    /// Wall-clock deadline for the whole crawl (milliseconds)
    pub timeout: u64,

    /// Number of concurrent workers in each pipeline stage
    pub workers: usize,

    /// Timeout applied to each individual HTTP request (milliseconds)
    pub request_timeout: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            politeness_delay: DEFAULT_POLITENESS_DELAY,
            timeout: DEFAULT_TIMEOUT,
            workers: DEFAULT_WORKERS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: format!("ripple-walker/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CrawlConfig {
    /// The politeness delay as a `Duration`
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay)
    }

    /// The crawl deadline as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// The per-request client timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }

    /// Frontier occupancy at or above which new candidates are dropped
    ///
    /// Sits at `max_requests - max_requests / 8`, roughly 87.5% of the
    /// frontier's capacity.
    pub fn high_water_mark(&self) -> usize {
        let mark = self.max_requests - self.max_requests / 8;
        usize::try_from(mark).unwrap_or(usize::MAX)
    }
}
