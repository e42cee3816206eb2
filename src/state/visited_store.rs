use crate::state::VisitState;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Shared mapping from canonical URL to its visit state
///
/// Every check-then-set goes through one method holding the lock for the whole
/// operation, so no caller can observe the map between the check and the write.
/// `try_claim` is the only way a URL may enter the frontier.
#[derive(Debug, Default)]
pub struct VisitedStore {
    visits: Mutex<HashMap<String, VisitState>>,
}

impl VisitedStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a canonical URL for crawling
    ///
    /// # Returns
    ///
    /// * `true` - The URL was unknown and is now `Pending`
    /// * `false` - The URL was already known, in any state
    pub fn try_claim(&self, url: &str) -> bool {
        let mut visits = self.lock();
        if visits.contains_key(url) {
            return false;
        }
        visits.insert(url.to_string(), VisitState::Pending);
        true
    }

    /// Marks a canonical URL as visited
    ///
    /// This is the fetch stage's gate: it performs the "already visited?" check
    /// and the transition in one step.
    ///
    /// # Returns
    ///
    /// * `true` - This call moved the URL to `Visited`
    /// * `false` - The URL was already `Visited`; the caller must not fetch it
    pub fn mark_visited(&self, url: &str) -> bool {
        let mut visits = self.lock();
        match visits.get_mut(url) {
            Some(state) if state.is_terminal() => false,
            Some(state) => {
                *state = VisitState::Visited;
                true
            }
            None => {
                // Every dispatched URL is claimed first
                tracing::warn!("Marking unclaimed URL as visited: {}", url);
                visits.insert(url.to_string(), VisitState::Visited);
                true
            }
        }
    }

    /// Returns the state of a URL, if it is known
    pub fn state(&self, url: &str) -> Option<VisitState> {
        self.lock().get(url).copied()
    }

    /// Number of URLs known to the store, in any state
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no URL has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of URLs that reached `Visited`
    pub fn visited_count(&self) -> usize {
        self.lock().values().filter(|state| state.is_terminal()).count()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, VisitState>> {
        // The map stays consistent even if a holder panicked: every critical
        // section is a single insert or assignment.
        self.visits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_store_is_empty() {
        let store = VisitedStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.visited_count(), 0);
    }

    #[test]
    fn test_try_claim_once() {
        let store = VisitedStore::new();

        assert!(store.try_claim("https://test.com/a/"));
        assert!(!store.try_claim("https://test.com/a/"));

        assert_eq!(store.state("https://test.com/a/"), Some(VisitState::Pending));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_try_claim_rejects_visited() {
        let store = VisitedStore::new();

        store.try_claim("https://test.com/a/");
        store.mark_visited("https://test.com/a/");

        assert!(!store.try_claim("https://test.com/a/"));
        assert_eq!(store.state("https://test.com/a/"), Some(VisitState::Visited));
    }

    #[test]
    fn test_mark_visited_once() {
        let store = VisitedStore::new();
        store.try_claim("https://test.com/a/");

        assert!(store.mark_visited("https://test.com/a/"));
        assert!(!store.mark_visited("https://test.com/a/"));
        assert_eq!(store.visited_count(), 1);
    }

    #[test]
    fn test_unknown_url_has_no_state() {
        let store = VisitedStore::new();
        assert_eq!(store.state("https://test.com/missing/"), None);
    }

    #[test]
    fn test_counts() {
        let store = VisitedStore::new();
        store.try_claim("https://test.com/");
        store.try_claim("https://test.com/a/");
        store.try_claim("https://test.com/b/");
        store.mark_visited("https://test.com/");

        assert_eq!(store.len(), 3);
        assert_eq!(store.visited_count(), 1);
    }

    #[test]
    fn test_concurrent_claims_admit_exactly_one() {
        let store = Arc::new(VisitedStore::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..100)
                        .filter(|i| store.try_claim(&format!("https://test.com/{}/", i)))
                        .count()
                })
            })
            .collect();

        let claimed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(claimed, 100);
        assert_eq!(store.len(), 100);
    }
}
