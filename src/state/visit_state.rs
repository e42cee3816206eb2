/// Visit state definitions for deduplicating crawl targets
use std::fmt;

/// Represents what the crawl knows about a canonical URL
///
/// The only legal transition is `Pending -> Visited`. A URL is never removed
/// from the store and never goes back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitState {
    /// URL is known and enqueued, but no fetch has been attempted yet
    Pending,

    /// A fetch was attempted; terminal whatever the outcome (including
    /// transport errors and non-2xx statuses)
    Visited,
}

impl VisitState {
    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Visited)
    }

    /// Returns true if moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: VisitState) -> bool {
        matches!((self, next), (Self::Pending, Self::Visited))
    }

    /// Short lowercase name, used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Visited => "visited",
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!VisitState::Pending.is_terminal());
        assert!(VisitState::Visited.is_terminal());
    }

    #[test]
    fn test_transitions_are_monotone() {
        assert!(VisitState::Pending.can_transition_to(VisitState::Visited));

        assert!(!VisitState::Visited.can_transition_to(VisitState::Pending));
        assert!(!VisitState::Visited.can_transition_to(VisitState::Visited));
        assert!(!VisitState::Pending.can_transition_to(VisitState::Pending));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", VisitState::Pending), "pending");
        assert_eq!(format!("{}", VisitState::Visited), "visited");
    }
}
