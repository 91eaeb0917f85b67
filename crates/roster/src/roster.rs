//! The roster controller.
//!
//! [`Roster`] owns the loaded collection and the active filter state. Views
//! borrow from it; nothing is shared globally.

use crate::filter::{self, FilterState};
use crate::record::StudentRecord;
use crate::stats::Summary;

/// Loaded student records plus the filter currently applied to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    records: Vec<StudentRecord>,
    filter: FilterState,
}

impl Roster {
    /// Create a roster over `records` with no active filter.
    #[must_use]
    pub fn new(records: Vec<StudentRecord>) -> Self {
        Self {
            records,
            filter: FilterState::default(),
        }
    }

    /// All loaded records, unfiltered.
    #[must_use]
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// The active filter state.
    #[must_use]
    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    /// Replace the active filter state.
    pub fn set_filter(&mut self, state: FilterState) {
        self.filter = state;
    }

    /// Drop every constraint.
    pub fn clear_filter(&mut self) {
        self.filter = FilterState::default();
    }

    /// Swap in a freshly loaded collection, keeping the filter.
    pub fn replace_records(&mut self, records: Vec<StudentRecord>) {
        self.records = records;
    }

    /// Records passing the active filter, in collection order.
    #[must_use]
    pub fn visible(&self) -> Vec<&StudentRecord> {
        filter::filter(&self.records, &self.filter)
    }

    /// Counts over the whole collection; the filter does not apply.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::of(&self.records)
    }
}
