use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::RedrawReport;
use crate::error::LoadError;

/// Handle for one in-flight revenue fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchTicket {
    pub year: i32,
    pub generation: u64,
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// Installed and redrawn.
    Applied(RedrawReport),
    /// Arrived after the selection moved on or a newer fetch was issued.
    Discarded {
        ticket: FetchTicket,
        current_year: i32,
    },
    /// The fetch itself failed; dependent charts stay blank.
    Failed(LoadError),
}

impl FetchOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    #[must_use]
    pub fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded { .. })
    }
}

/// Tracks the newest ticket per year so stale completions can be dropped.
#[derive(Debug, Clone, Default)]
pub struct FetchTracker {
    next_generation: u64,
    latest: BTreeMap<i32, u64>,
}

impl FetchTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, year: i32) -> FetchTicket {
        self.next_generation += 1;
        self.latest.insert(year, self.next_generation);
        FetchTicket {
            year,
            generation: self.next_generation,
        }
    }

    /// A ticket applies only while it is the newest for its year and its
    /// year is still selected.
    #[must_use]
    pub fn accepts(&self, ticket: FetchTicket, selected_year: i32) -> bool {
        ticket.year == selected_year && self.latest.get(&ticket.year) == Some(&ticket.generation)
    }

    /// Forgets the ticket once completed so a replay is rejected.
    pub fn settle(&mut self, ticket: FetchTicket) {
        if self.latest.get(&ticket.year) == Some(&ticket.generation) {
            self.latest.remove(&ticket.year);
        }
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.latest.len()
    }
}

#[cfg(test)]
mod tests {
    use super::FetchTracker;

    #[test]
    fn newer_ticket_and_year_change_both_invalidate() {
        let mut tracker = FetchTracker::new();
        let first = tracker.issue(2019);
        let second = tracker.issue(2019);
        assert!(!tracker.accepts(first, 2019));
        assert!(tracker.accepts(second, 2019));
        assert!(!tracker.accepts(second, 2020));

        tracker.settle(second);
        assert!(!tracker.accepts(second, 2019));
        assert_eq!(tracker.pending(), 0);
    }
}
