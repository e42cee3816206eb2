//! Output module for crawl summaries and reports
//!
//! This module handles:
//! - The summary a crawl returns when it terminates
//! - Rendering that summary for the command line

mod report;
mod summary;

pub use report::{format_summary, print_summary};
pub use summary::{CrawlOutcome, CrawlSummary};
