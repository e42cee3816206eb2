//! Configuration module for Ripple-Walker
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every crawler key is optional and falls back to its default; only the start
//! URL has to come from somewhere (the file or the command line).
//!
//! # Example
//!
//! ```no_run
//! use ripple_walker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Request budget: {}", config.crawler.max_requests);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, validate_crawl_config, validate_start_url};
