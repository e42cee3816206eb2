//! State module for tracking crawl progress
//!
//! This module provides the shared state of a single crawl.
//!
//! # Components
//!
//! - `VisitState`: Tracks whether a canonical URL is pending or already visited
//! - `VisitedStore`: The single source of truth for deduplication
//! - `Counters`: Lock-free dispatch/completion counters used for pacing and termination

mod counters;
mod visit_state;
mod visited_store;

// Re-export main types
pub use counters::Counters;
pub use visit_state::VisitState;
pub use visited_store::VisitedStore;
