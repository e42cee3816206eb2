use url::Url;

/// Canonicalizes an absolute URL into the crawl's deduplication key
///
/// # Canonicalization Steps
///
/// 1. Collapse repeated path separators
/// 2. Remove dot segments (`.` and `..`)
/// 3. Append a trailing `/` to the path (the root stays `/`)
///
/// Scheme, host, port, query and fragment are carried through unaltered.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_walker::url::canonicalize;
///
/// let url = Url::parse("https://example.com/link/1").unwrap();
/// assert_eq!(canonicalize(&url), "https://example.com/link/1/");
/// ```
pub fn canonicalize(url: &Url) -> String {
    let mut canonical = url.clone();
    canonical.set_path(&canonical_path(url.path()));
    canonical.into()
}

/// Cleans a URL path and guarantees it ends with a separator
fn canonical_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}/", segments.join("/"))
}
