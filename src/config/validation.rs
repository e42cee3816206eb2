use crate::config::types::{Config, CrawlConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the width of a single pipeline stage
const MAX_WORKERS: usize = 1_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_start_url(&config.start_url)?;
    validate_crawl_config(&config.crawler)?;
    Ok(())
}

/// Validates crawler configuration
pub fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_requests < 1 {
        return Err(ConfigError::Validation(format!(
            "max_requests must be >= 1, got {}",
            config.max_requests
        )));
    }

    // politeness_delay >= 0 is always true for u64, so no check needed

    if config.timeout < 1 {
        return Err(ConfigError::Validation("timeout must be >= 1ms".to_string()));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation("request_timeout must be >= 1ms".to_string()));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation("user_agent cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates the start URL: required, absolute, with a host
pub fn validate_start_url(start_url: &str) -> Result<(), ConfigError> {
    if start_url.trim().is_empty() {
        return Err(ConfigError::Validation("start_url is required".to_string()));
    }

    let url = Url::parse(start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", start_url, e)))?;

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "start_url '{}' has no host",
            start_url
        )));
    }

    Ok(())
}
