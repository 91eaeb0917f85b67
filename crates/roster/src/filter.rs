//! Filter engine for student records.
//!
//! A [`FilterState`] is a conjunction of one free-text search and four
//! categorical selections. Filtering is pure and preserves collection order.

use tracing::trace;

use crate::record::StudentRecord;

/// The literal that selects every value of a categorical field.
pub const ALL: &str = "all";

/// A categorical constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Accept every value.
    #[default]
    All,
    /// Accept only this exact (case-sensitive) value.
    Only(String),
}

impl Selection {
    /// Parse a selection; `"all"` and the empty string mean [`Selection::All`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == ALL {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    /// Check whether `value` passes this selection.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    /// Check whether this selection accepts everything.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<Option<String>> for Selection {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map_or(Self::All, Self::parse)
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(value) => f.write_str(value),
        }
    }
}

/// The active search and categorical constraints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    /// Case-insensitive substring matched against every field; empty matches all.
    pub search: String,
    /// Constraint on `program`.
    pub program: Selection,
    /// Constraint on `gender`.
    pub gender: Selection,
    /// Constraint on `yearLevel`.
    pub year_level: Selection,
    /// Constraint on `university`.
    pub university: Selection,
}

impl FilterState {
    /// A state that accepts every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text search.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Set the program selection.
    #[must_use]
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = Selection::parse(program);
        self
    }

    /// Set the gender selection.
    #[must_use]
    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = Selection::parse(gender);
        self
    }

    /// Set the year level selection.
    #[must_use]
    pub fn with_year_level(mut self, year_level: &str) -> Self {
        self.year_level = Selection::parse(year_level);
        self
    }

    /// Set the university selection.
    #[must_use]
    pub fn with_university(mut self, university: &str) -> Self {
        self.university = Selection::parse(university);
        self
    }

    /// Check whether this state passes every record.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && self.program.is_all()
            && self.gender.is_all()
            && self.year_level.is_all()
            && self.university.is_all()
    }

    /// Check whether `record` satisfies every constraint.
    #[must_use]
    pub fn matches(&self, record: &StudentRecord) -> bool {
        self.matches_lowered(record, &self.search.to_lowercase())
    }

    fn matches_lowered(&self, record: &StudentRecord, needle: &str) -> bool {
        let text_ok = needle.is_empty()
            || record
                .field_values()
                .iter()
                .any(|value| value.to_lowercase().contains(needle));

        text_ok
            && self.program.accepts(&record.program)
            && self.gender.accepts(record.gender.as_str())
            && self.year_level.accepts(&record.year_level)
            && self.university.accepts(&record.university)
    }
}

/// Select the records that satisfy `state`, in collection order.
#[must_use]
pub fn filter<'a>(records: &'a [StudentRecord], state: &FilterState) -> Vec<&'a StudentRecord> {
    let needle = state.search.to_lowercase();
    let visible: Vec<_> = records
        .iter()
        .filter(|record| state.matches_lowered(record, &needle))
        .collect();
    trace!(
        total = records.len(),
        visible = visible.len(),
        "Applied filter"
    );
    visible
}
