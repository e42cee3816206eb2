//! URL handling module for Ripple-Walker
//!
//! This module provides link resolution against the start URL, canonicalization
//! of crawl targets, and the same-host test that bounds a crawl to one site.

mod canonical;
mod domain;

use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

// Re-export main functions
pub use canonical::canonicalize;
pub use domain::{extract_host, same_host};

/// Resolves a raw link string into an absolute URL
///
/// Absolute links are returned as parsed. Relative references are resolved
/// against `base`. Anything else that fails to parse is rejected; the caller
/// decides whether that is worth more than a debug line.
///
/// # Arguments
///
/// * `raw` - The link as found in the page, possibly relative or malformed
/// * `base` - The URL relative links are resolved against
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL
/// * `Err(UrlError)` - The link could not be parsed
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_walker::url::resolve_link;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// let url = resolve_link("/about", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn resolve_link(raw: &str, base: &Url) -> UrlResult<Url> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => base
            .join(raw)
            .map_err(|e| UrlError::Parse(format!("{}: {}", raw, e))),
        Err(e) => Err(UrlError::Parse(format!("{}: {}", raw, e))),
    }
}

/// Parses the crawl's start URL into its canonical absolute form
///
/// The result has a host and a trailing path separator, which makes it both
/// the first crawl target and the base for resolving relative links.
pub fn parse_start_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if extract_host(&url).is_none() {
        return Err(UrlError::MissingHost(raw.to_string()));
    }

    let canonical = canonicalize(&url);
    Url::parse(&canonical).map_err(|e| UrlError::Malformed(format!("{}: {}", canonical, e)))
}
