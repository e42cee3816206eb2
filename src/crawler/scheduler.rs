//! Scheduler and termination loop
//!
//! This module handles:
//! - Pacing dispatches to one per politeness period
//! - Deciding when the crawl is over (budget or quiescence)
//! - Cancelling the crawl once it is

use crate::crawler::context::CrawlContext;
use crate::output::CrawlOutcome;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Shortest period the ticker accepts
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// One unit of work for the fetch stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Strictly increasing, starting at 1
    pub sequence_id: u64,

    /// Canonical URL to fetch
    pub target: String,
}

/// What one tick decided
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Tick {
    Stop(CrawlOutcome),
    Dispatch(String),
    Idle,
}

/// Sole consumer of the frontier
///
/// Owns the sending side of the dispatch queue. Dropping the scheduler closes
/// that queue, which shuts the pipeline down stage by stage.
pub(crate) struct Scheduler {
    ctx: Arc<CrawlContext>,
    jobs: mpsc::Sender<DispatchRequest>,
    period: Duration,
}

impl Scheduler {
    pub fn new(ctx: Arc<CrawlContext>, jobs: mpsc::Sender<DispatchRequest>) -> Self {
        let period = ctx.config.politeness_delay().max(MIN_PERIOD);
        Self { ctx, jobs, period }
    }

    /// Evaluates the termination rules, then pops at most one URL
    pub fn next_action(&self) -> Tick {
        let counters = &self.ctx.counters;

        if counters.completed() >= self.ctx.config.max_requests {
            return Tick::Stop(CrawlOutcome::BudgetExhausted);
        }

        // Counters first: work still in flight may be about to push
        if counters.is_idle() && self.ctx.frontier.is_empty() {
            return Tick::Stop(CrawlOutcome::Quiescent);
        }

        match self.ctx.frontier.pop() {
            Some(target) => Tick::Dispatch(target),
            None => Tick::Idle,
        }
    }

    /// Runs until a terminal state, cancelling the crawl on the way out
    ///
    /// The first tick fires one period after the call.
    pub async fn run(self) -> CrawlOutcome {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match self.next_action() {
                Tick::Stop(outcome) => {
                    tracing::info!(
                        "Crawl finished ({}): {} dispatched, {} completed",
                        outcome,
                        self.ctx.counters.dispatched(),
                        self.ctx.counters.completed()
                    );
                    self.ctx.cancel.cancel();
                    return outcome;
                }
                Tick::Dispatch(target) => {
                    let sequence_id = self.ctx.counters.dispatch();
                    tracing::debug!("Dispatching #{}: {}", sequence_id, target);

                    let request = DispatchRequest {
                        sequence_id,
                        target,
                    };
                    tokio::select! {
                        _ = self.ctx.cancel.cancelled() => {
                            return CrawlOutcome::DeadlineExpired;
                        }
                        sent = self.jobs.send(request) => {
                            if sent.is_err() {
                                tracing::error!("Fetch stage closed while crawl was running");
                                self.ctx.counters.complete();
                            }
                        }
                    }
                }
                Tick::Idle => {
                    tracing::trace!(
                        "Idle tick: {} in flight, {} in pipeline",
                        self.ctx
                            .counters
                            .dispatched()
                            .saturating_sub(self.ctx.counters.completed()),
                        self.ctx.counters.in_pipeline()
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;
    use crate::crawler::test_support::{test_context, StubFetcher};

    fn build_scheduler(max_requests: u64) -> (Scheduler, mpsc::Receiver<DispatchRequest>) {
        let config = CrawlConfig {
            max_requests,
            politeness_delay: 1,
            ..CrawlConfig::default()
        };
        let ctx = test_context(config, Arc::new(StubFetcher::new()));
        let (tx, rx) = mpsc::channel(16);
        (Scheduler::new(ctx, tx), rx)
    }

    #[test]
    fn test_empty_and_idle_is_quiescent() {
        let (scheduler, _rx) = build_scheduler(10);
        assert_eq!(scheduler.next_action(), Tick::Stop(CrawlOutcome::Quiescent));
    }

    #[test]
    fn test_in_flight_work_blocks_quiescence() {
        let (scheduler, _rx) = build_scheduler(10);
        let counters = &scheduler.ctx.counters;

        counters.dispatch();
        assert_eq!(scheduler.next_action(), Tick::Idle);

        counters.enter_pipeline();
        counters.complete();
        assert_eq!(scheduler.next_action(), Tick::Idle);

        counters.leave_pipeline();
        assert_eq!(scheduler.next_action(), Tick::Stop(CrawlOutcome::Quiescent));
    }

    #[test]
    fn test_budget_takes_precedence() {
        let (scheduler, _rx) = build_scheduler(2);
        scheduler.ctx.frontier.push("https://test.com/a/".to_string());
        scheduler.ctx.counters.complete();
        scheduler.ctx.counters.complete();

        assert_eq!(
            scheduler.next_action(),
            Tick::Stop(CrawlOutcome::BudgetExhausted)
        );
    }

    #[test]
    fn test_pops_one_per_tick() {
        let (scheduler, _rx) = build_scheduler(10);
        scheduler.ctx.frontier.push("https://test.com/a/".to_string());
        scheduler.ctx.frontier.push("https://test.com/b/".to_string());

        assert_eq!(
            scheduler.next_action(),
            Tick::Dispatch("https://test.com/a/".to_string())
        );
        assert_eq!(scheduler.ctx.frontier.len(), 1);
    }

    #[test]
    fn test_zero_delay_is_clamped() {
        let config = CrawlConfig {
            politeness_delay: 0,
            ..CrawlConfig::default()
        };
        let ctx = test_context(config, Arc::new(StubFetcher::new()));
        let (tx, _rx) = mpsc::channel(1);
        assert_eq!(Scheduler::new(ctx, tx).period, MIN_PERIOD);
    }

    #[tokio::test]
    async fn test_run_dispatches_in_order_then_stops() {
        let (scheduler, mut rx) = build_scheduler(10);
        let ctx = scheduler.ctx.clone();
        ctx.frontier.push("https://test.com/a/".to_string());
        ctx.frontier.push("https://test.com/b/".to_string());

        let handle = tokio::spawn(scheduler.run());

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.sequence_id, 1);
        assert_eq!(first.target, "https://test.com/a/");
        assert_eq!(second.sequence_id, 2);
        assert_eq!(second.target, "https://test.com/b/");

        // Nothing in flight after both complete
        ctx.counters.complete();
        ctx.counters.complete();

        assert_eq!(handle.await.unwrap(), CrawlOutcome::Quiescent);
        assert!(ctx.cancel.is_cancelled());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_run_stops_on_budget() {
        let (scheduler, _rx) = build_scheduler(1);
        let ctx = scheduler.ctx.clone();
        ctx.frontier.push("https://test.com/a/".to_string());
        ctx.counters.complete();

        assert_eq!(scheduler.run().await, CrawlOutcome::BudgetExhausted);
        assert!(ctx.cancel.is_cancelled());
    }
}
