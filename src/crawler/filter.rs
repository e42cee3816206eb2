//! Resolve/filter stage
//!
//! Decides, link by link, whether a raw `href` becomes a new frontier entry.

use crate::crawler::context::CrawlContext;
use crate::crawler::pool::StageQueue;
use crate::url::{canonicalize, resolve_link, same_host};
use std::fmt;
use std::sync::Arc;

/// What happened to one discovered link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkDecision {
    /// Could not be parsed or resolved
    Malformed,
    /// Host differs from the start URL's host
    OffDomain,
    /// Canonical form was already known
    Duplicate,
    /// The request budget was already reached
    OverBudget,
    /// The frontier was at its high-water mark
    FrontierFull,
    /// Queued for dispatch
    Enqueued,
}

impl LinkDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::OffDomain => "off_domain",
            Self::Duplicate => "duplicate",
            Self::OverBudget => "over_budget",
            Self::FrontierFull => "frontier_full",
            Self::Enqueued => "enqueued",
        }
    }
}

impl fmt::Display for LinkDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runs one filter worker until its queue closes
pub(crate) async fn filter_worker(id: usize, ctx: Arc<CrawlContext>, links: StageQueue<String>) {
    tracing::trace!("Filter worker {} started", id);

    while let Some(raw) = links.recv().await {
        let decision = filter_link(&ctx, &raw);
        tracing::debug!("Link {:?}: {}", raw, decision);
        ctx.counters.leave_pipeline();
    }

    tracing::trace!("Filter worker {} stopped", id);
}

/// Applies the admission rules to one raw link, in order
///
/// 1. Resolve against the start URL
/// 2. Require the start URL's exact host
/// 3. Canonicalize and claim in the visited store
/// 4. Drop if the budget is already used up
/// 5. Push unless the frontier is at its high-water mark
///
/// A link dropped after step 3 stays claimed and is never reconsidered.
pub(crate) fn filter_link(ctx: &CrawlContext, raw: &str) -> LinkDecision {
    let url = match resolve_link(raw, &ctx.start_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Dropping unparseable link: {}", e);
            return LinkDecision::Malformed;
        }
    };

    if !same_host(&url, &ctx.start_url) {
        return LinkDecision::OffDomain;
    }

    let canonical = canonicalize(&url);
    if !ctx.store.try_claim(&canonical) {
        return LinkDecision::Duplicate;
    }

    if ctx.counters.completed() >= ctx.config.max_requests {
        return LinkDecision::OverBudget;
    }

    if !ctx.frontier.push(canonical) {
        return LinkDecision::FrontierFull;
    }

    LinkDecision::Enqueued
}
