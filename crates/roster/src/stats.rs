//! Aggregate counts over a student collection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::{Gender, StudentRecord};

/// Totals reported by the stats summary endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of records.
    pub total: usize,
    /// Records with gender `Male`.
    pub male: usize,
    /// Records with gender `Female`.
    pub female: usize,
    /// Number of distinct `program` values.
    pub programs: usize,
}

impl Summary {
    /// Compute the summary of `records`.
    #[must_use]
    pub fn of(records: &[StudentRecord]) -> Self {
        let male = records.iter().filter(|r| r.gender == Gender::Male).count();
        let female = records.iter().filter(|r| r.gender == Gender::Female).count();
        let programs = records
            .iter()
            .map(|r| r.program.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            total: records.len(),
            male,
            female,
            programs,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} students ({} male, {} female) across {} programs",
            self.total, self.male, self.female, self.programs
        )
    }
}
