use crate::config::CrawlConfig;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Upper bound on the frontier's up-front allocation
const INITIAL_CAPACITY_LIMIT: usize = 1_024;

/// FIFO of canonical URLs waiting to be dispatched
///
/// Filter workers are the producers and the scheduler is the only consumer.
/// The frontier never blocks a producer: once its occupancy reaches the
/// high-water mark, new candidates are refused and the caller drops them.
#[derive(Debug)]
pub struct Frontier {
    queue: Mutex<VecDeque<String>>,
    capacity: usize,
    high_water_mark: usize,
}

impl Frontier {
    /// Creates a frontier bounded by the request budget
    pub fn new(config: &CrawlConfig) -> Self {
        let capacity = usize::try_from(config.max_requests).unwrap_or(usize::MAX);
        Self::with_limits(capacity, config.high_water_mark())
    }

    /// Creates a frontier with explicit limits
    ///
    /// The high-water mark is clamped to the capacity.
    pub fn with_limits(capacity: usize, high_water_mark: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(
                high_water_mark.min(INITIAL_CAPACITY_LIMIT),
            )),
            capacity,
            high_water_mark: high_water_mark.min(capacity),
        }
    }

    /// Appends a URL if occupancy is below the high-water mark
    ///
    /// The occupancy check and the push happen under one lock.
    ///
    /// # Returns
    ///
    /// * `true` - The URL was queued
    /// * `false` - The frontier is at its high-water mark; the URL was dropped
    pub fn push(&self, url: String) -> bool {
        let mut queue = self.lock();
        if queue.len() >= self.high_water_mark {
            return false;
        }
        queue.push_back(url);
        true
    }

    /// Removes the oldest URL
    pub fn pop(&self) -> Option<String> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
