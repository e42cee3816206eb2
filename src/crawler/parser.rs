//! Extraction stage
//!
//! Turns an HTML body into the raw `href` values of its anchors. Nothing is
//! resolved or validated here; the filter stage decides what each link means.

use crate::crawler::context::CrawlContext;
use crate::crawler::fetcher::HtmlPage;
use crate::crawler::pool::StageQueue;
use crate::CrawlError;
use scraper::{Html, Selector};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Extracts every anchor `href` from an HTML body
///
/// Links come back in document order, duplicates included, exactly as written
/// in the page. Anchors without an `href` attribute are skipped. Bytes that
/// are not valid UTF-8 are replaced, so pages in a legacy charset still yield
/// their links.
///
/// # Errors
///
/// Returns `CrawlError::HtmlParse` if the anchor selector cannot be built.
///
/// # Example
///
/// ```
/// use ripple_walker::crawler::extract_links;
///
/// let html = br#"<html><body><a href="/page">Link</a><a href="/page">Again</a></body></html>"#;
/// let links = extract_links(html).unwrap();
/// assert_eq!(links, vec!["/page", "/page"]);
/// ```
pub fn extract_links(body: &[u8]) -> Result<Vec<String>, CrawlError> {
    let selector = Selector::parse("a[href]").map_err(|e| CrawlError::HtmlParse {
        message: format!("{:?}", e),
    })?;

    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);
    let links = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect();

    Ok(links)
}

/// Runs one extraction worker until its queue closes
pub(crate) async fn extract_worker(
    id: usize,
    ctx: Arc<CrawlContext>,
    pages: StageQueue<HtmlPage>,
    links: mpsc::Sender<String>,
) {
    tracing::trace!("Extraction worker {} started", id);

    while let Some(page) = pages.recv().await {
        forward_links(&ctx, page, &links).await;
    }

    tracing::trace!("Extraction worker {} stopped", id);
}

/// Extracts one page's links and hands them to the filter stage
///
/// Each link joins the pipeline gauge before the page leaves it.
pub(crate) async fn forward_links(ctx: &CrawlContext, page: HtmlPage, links: &mpsc::Sender<String>) {
    let HtmlPage { url, body } = page;

    let extracted = extract_links(&body);
    drop(body);

    match extracted {
        Ok(found) => {
            tracing::debug!("Extracted {} links from {}", found.len(), url);
            for link in found {
                ctx.counters.enter_pipeline();
                if links.send(link).await.is_err() {
                    ctx.counters.leave_pipeline();
                }
            }
        }
        Err(e) => {
            tracing::error!("Failed to parse {}: {}", url, e);
        }
    }

    ctx.counters.leave_pipeline();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;
    use crate::crawler::test_support::{test_context, StubFetcher};
    use url::Url;

    #[test]
    fn test_extract_absolute_link() {
        let html = br#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        assert_eq!(extract_links(html).unwrap(), vec!["https://other.com/page"]);
    }

    #[test]
    fn test_relative_links_are_not_resolved() {
        let html = br#"<html><body><a href="/other">A</a><a href="other">B</a></body></html>"#;
        assert_eq!(extract_links(html).unwrap(), vec!["/other", "other"]);
    }

    #[test]
    fn test_document_order_with_duplicates() {
        let html = br#"
            <html>
            <body>
                <nav><a href="/b">B</a></nav>
                <a href="/a">A</a>
                <a href="/b">B again</a>
                <footer><a href="https://other.com/">Other</a></footer>
            </body>
            </html>
        "#;
        assert_eq!(
            extract_links(html).unwrap(),
            vec!["/b", "/a", "/b", "https://other.com/"]
        );
    }

    #[test]
    fn test_unusual_schemes_are_kept() {
        let html = br#"<a href="javascript:void(0)">J</a><a href="mailto:test@example.com">M</a>"#;
        assert_eq!(
            extract_links(html).unwrap(),
            vec!["javascript:void(0)", "mailto:test@example.com"]
        );
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let html = br#"<a name="top">Top</a><a href="">Self</a>"#;
        assert_eq!(extract_links(html).unwrap(), vec![""]);
    }

    #[test]
    fn test_only_anchor_elements() {
        let html = br#"
            <html><head>
                <link rel="canonical" href="https://example.com/canonical" />
                <link rel="stylesheet" href="/style.css" />
                <script src="/app.js"></script>
            </head>
            <body><img src="/logo.png"></body></html>
        "#;
        assert!(extract_links(html).unwrap().is_empty());
    }

    #[test]
    fn test_empty_and_malformed_html() {
        assert!(extract_links(b"").unwrap().is_empty());
        assert_eq!(
            extract_links(b"<a href='/x'>unclosed <div><p>").unwrap(),
            vec!["/x"]
        );
    }

    #[test]
    fn test_legacy_charset_bytes_keep_links() {
        // Latin-1 "caf\xe9" between two anchors
        let body = b"<a href=\"/menu\">caf\xe9</a><a href=\"/about\">about</a>";
        assert_eq!(extract_links(body).unwrap(), vec!["/menu", "/about"]);
    }

    #[test]
    fn test_invalid_bytes_inside_href_are_replaced() {
        let body = [
            b'<', b'a', b' ', b'h', b'r', b'e', b'f', b'=', b'"', b'/', b'x', 0xff, b'"', b'>',
            b'<', b'/', b'a', b'>',
        ];
        assert_eq!(extract_links(&body).unwrap(), vec!["/x\u{FFFD}"]);
    }

    #[tokio::test]
    async fn test_forward_links_balances_pipeline() {
        let ctx = test_context(CrawlConfig::default(), Arc::new(StubFetcher::new()));
        let (tx, mut rx) = mpsc::channel(8);

        ctx.counters.enter_pipeline();
        let page = HtmlPage {
            url: Url::parse("https://test.com/").unwrap(),
            body: br#"<a href="/a">A</a><a href="/b">B</a>"#.to_vec(),
        };
        forward_links(&ctx, page, &tx).await;

        assert_eq!(ctx.counters.in_pipeline(), 2);
        assert_eq!(rx.recv().await.as_deref(), Some("/a"));
        assert_eq!(rx.recv().await.as_deref(), Some("/b"));
    }

    #[tokio::test]
    async fn test_forward_links_from_non_utf8_page() {
        let ctx = test_context(CrawlConfig::default(), Arc::new(StubFetcher::new()));
        let (tx, mut rx) = mpsc::channel(8);

        ctx.counters.enter_pipeline();
        let page = HtmlPage {
            url: Url::parse("https://test.com/").unwrap(),
            body: b"<p>\xff\xfe</p><a href=\"/next\">next</a>".to_vec(),
        };
        forward_links(&ctx, page, &tx).await;
        drop(tx);

        assert_eq!(ctx.counters.in_pipeline(), 1);
        assert_eq!(rx.recv().await.as_deref(), Some("/next"));
        assert!(rx.recv().await.is_none());
    }
}
