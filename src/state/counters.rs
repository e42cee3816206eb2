use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters shared by the scheduler and the pipeline stages
///
/// - `dispatched` counts requests the scheduler handed to the fetch stage and
///   doubles as the source of sequence ids.
/// - `completed` counts fetch-stage units of work that finished, whatever
///   their outcome. It drives the request budget.
/// - `in_pipeline` counts HTML bodies and raw links still travelling through the
///   extraction and filter stages.
///
/// A fetch worker enters the pipeline before it records completion, and a
/// filter worker leaves it only after its frontier push. Reading `completed`,
/// then `in_pipeline`, then the frontier therefore never misses work that is
/// about to produce new frontier entries.
#[derive(Debug, Default)]
pub struct Counters {
    dispatched: AtomicU64,
    completed: AtomicU64,
    in_pipeline: AtomicU64,
}

impl Counters {
    /// Creates zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a dispatch and returns its sequence id (starting at 1)
    pub fn dispatch(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Records one completed unit of fetch-stage work
    pub fn complete(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    /// Records one item entering the extraction/filter stages
    pub fn enter_pipeline(&self) {
        self.in_pipeline.fetch_add(1, Ordering::SeqCst);
    }

    /// Records one item leaving the extraction/filter stages
    pub fn leave_pipeline(&self) {
        self.in_pipeline.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn in_pipeline(&self) -> u64 {
        self.in_pipeline.load(Ordering::SeqCst)
    }

    /// True when every dispatched request finished and nothing is left
    /// travelling towards the frontier
    pub fn is_idle(&self) -> bool {
        let completed = self.completed();
        let dispatched = self.dispatched();
        dispatched == completed && self.in_pipeline() == 0
    }
}
