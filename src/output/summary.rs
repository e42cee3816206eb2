//! Crawl outcome and summary types
//!
//! A crawl always ends in exactly one terminal state. The summary records that
//! state together with the counters the termination policy looked at.

use chrono::{DateTime, Utc};
use std::fmt;

/// Terminal state a crawl ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlOutcome {
    /// The completed count reached the request budget
    BudgetExhausted,

    /// The frontier was empty and no work was in flight
    Quiescent,

    /// The overall deadline elapsed first
    DeadlineExpired,
}

impl CrawlOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetExhausted => "budget_exhausted",
            Self::Quiescent => "quiescent",
            Self::DeadlineExpired => "deadline_expired",
        }
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary statistics for a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Canonical start URL
    pub start_url: String,

    /// How the crawl terminated
    pub outcome: CrawlOutcome,

    /// Requests handed to the fetch stage
    pub dispatched: u64,

    /// Fetch-stage units of work that finished, whatever their outcome
    pub completed: u64,

    /// Canonical URLs claimed in the visited store
    pub urls_known: usize,

    /// Canonical URLs a fetch was attempted for
    pub urls_visited: usize,

    /// Canonical URLs still waiting in the frontier at shutdown
    pub frontier_remaining: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    /// Wall-clock time the crawl took
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Completed units of work per second of crawl time
    pub fn pages_per_second(&self) -> f64 {
        let millis = self.duration().num_milliseconds();
        if millis <= 0 {
            return 0.0;
        }
        self.completed as f64 / (millis as f64 / 1000.0)
    }
}
