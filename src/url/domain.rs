use url::Url;

/// Extracts the host from a URL
///
/// The port is not part of the host. URLs without a host (`mailto:`,
/// `javascript:`, `data:` and friends) return `None`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_walker::url::extract_host;
///
/// let url = Url::parse("https://example.com:8443/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com"));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_host(&url), None);
/// ```
pub fn extract_host(url: &Url) -> Option<&str> {
    url.host_str()
}

/// Returns true if both URLs have a host and the hosts are identical strings
///
/// No subdomain or wildcard matching, and scheme and port are ignored.
pub fn same_host(url: &Url, other: &Url) -> bool {
    matches!(
        (extract_host(url), extract_host(other)),
        (Some(a), Some(b)) if a == b
    )
}
