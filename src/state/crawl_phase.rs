/// Phase definitions for the pagination controller
///
/// A crawl moves strictly forward through these phases.
use std::fmt;

/// Represents the current phase of a pagination run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Page range clamped, nothing dispatched yet
    Scheduling,

    /// Pages are being dispatched under the concurrency limit
    Running,

    /// No further dispatch; awaiting pages already in flight
    Draining,

    /// Results merged; the run is over
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from this phase to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Scheduling, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Draining, Self::Done)
        )
    }

    /// Returns true if this is the final phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while new pages may still be dispatched
    pub fn accepts_dispatch(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduling => "scheduling",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
