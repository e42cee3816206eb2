use crate::config::types::Config;
use crate::config::validation::validate_crawl_config;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Only the crawler section is validated here. The start URL may still be
/// supplied on the command line, so it is checked once all sources are merged.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use ripple_walker::config::load_config;
///
/// let config = load_config(Path::new("crawl.toml")).unwrap();
/// println!("Politeness delay: {}ms", config.crawler.politeness_delay);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate_crawl_config(&config.crawler)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at start-up so two runs can be matched to the exact settings they used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
start-url = "https://example.com"

[crawler]
max-requests = 500
politeness-delay = 250
timeout = 60000
workers = 8
request-timeout = 1500
user-agent = "TestCrawler/1.0"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.start_url, "https://example.com");
        assert_eq!(config.crawler.max_requests, 500);
        assert_eq!(config.crawler.politeness_delay, 250);
        assert_eq!(config.crawler.timeout, 60_000);
        assert_eq!(config.crawler.workers, 8);
        assert_eq!(config.crawler.request_timeout, 1_500);
        assert_eq!(config.crawler.user_agent, "TestCrawler/1.0");
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config_content = r#"
[crawler]
max-requests = 42
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert!(config.start_url.is_empty());
        assert_eq!(config.crawler.max_requests, 42);
        assert_eq!(config.crawler.politeness_delay, 100);
        assert_eq!(config.crawler.workers, 100);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/crawl.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
max-requests = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config("start-url = \"https://example.com\"\n");
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.start_url, "https://example.com");
        assert_eq!(hash.len(), 64);
    }
}
