//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - A three-stage pipeline (fetch, extract, resolve/filter), each stage a
//!   fixed pool of workers behind one bounded queue
//! - The frontier and its high-water mark
//! - The scheduler that paces dispatches and decides termination
//! - Overall crawl coordination

mod context;
mod coordinator;
mod fetcher;
mod filter;
mod frontier;
mod observer;
mod parser;
mod pool;
mod scheduler;

#[cfg(test)]
mod test_support;

pub use coordinator::Crawler;
pub use fetcher::{build_http_client, FetchError, FetchResponse, Fetcher, HttpFetcher};
pub use filter::LinkDecision;
pub use frontier::Frontier;
pub use observer::{ObserverRegistry, VisitObserver};
pub use parser::extract_links;
pub use scheduler::DispatchRequest;

pub use crate::output::{CrawlOutcome, CrawlSummary};
