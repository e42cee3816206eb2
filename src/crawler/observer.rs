//! Visit observers
//!
//! Observers are the crawl's only output channel. Each one is called once for
//! every fetch that produced a response, on the fetch worker that received it.

use crate::crawler::FetchResponse;
use std::fmt;
use std::sync::Arc;

/// Receives every successfully fetched response
///
/// "Successfully" means a response came back: non-2xx statuses and non-HTML
/// bodies are reported too. Transport failures are not.
///
/// Calls happen synchronously on fetch workers and may run concurrently from
/// several workers, so implementations must be `Send + Sync` and should return
/// quickly.
///
/// Any `Fn(&FetchResponse) + Send + Sync` closure is an observer:
///
/// ```
/// use ripple_walker::{Crawler, CrawlConfig};
///
/// let mut crawler = Crawler::new(CrawlConfig::default()).unwrap();
/// crawler.on_visited(|response: &ripple_walker::FetchResponse| {
///     println!("{} {}", response.status, response.url);
/// });
/// ```
pub trait VisitObserver: Send + Sync {
    fn on_visited(&self, response: &FetchResponse);
}

impl<F> VisitObserver for F
where
    F: Fn(&FetchResponse) + Send + Sync,
{
    fn on_visited(&self, response: &FetchResponse) {
        self(response)
    }
}

/// Ordered list of observers, notified in registration order
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    observers: Vec<Arc<dyn VisitObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an observer
    pub fn register(&mut self, observer: Arc<dyn VisitObserver>) {
        self.observers.push(observer);
    }

    /// Calls every observer with the response
    pub fn notify_visited(&self, response: &FetchResponse) {
        for observer in &self.observers {
            observer.on_visited(response);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}
