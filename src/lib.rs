//! Ripple-Walker: a bounded, polite, single-domain web crawler
//!
//! This crate walks one website from a start URL, following same-host links and
//! visiting every distinct page at most once. A crawl is bounded by a request
//! budget, paced by a politeness delay and cut off by a wall-clock deadline.
//! Callers observe the crawl by registering visit observers.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Ripple-Walker operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid start URL '{url}': {reason}")]
    InvalidStartUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTML parse error: {message}")]
    HtmlParse { message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Ripple-Walker operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlConfig};
pub use crawler::{
    CrawlOutcome, CrawlSummary, Crawler, FetchError, FetchResponse, Fetcher, HttpFetcher,
    VisitObserver,
};
pub use state::{VisitState, VisitedStore};
pub use crate::url::{canonicalize, resolve_link};
