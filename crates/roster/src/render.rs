//! Text rendering of records and summaries for the command line.

use crate::error::Result;
use crate::record::StudentRecord;

/// Shown in place of an empty listing.
pub const EMPTY_MESSAGE: &str = "No students found.";

const HEADERS: [&str; 7] = [
    "ID",
    "Full Name",
    "Gender",
    "Email",
    "Program",
    "Year Level",
    "University",
];

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One line per record.
    Plain,
    /// Aligned columns under a header.
    Table,
    /// Pretty-printed JSON array.
    Json,
}

/// Render `records` in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn records(records: &[&StudentRecord], format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(records)?),
        _ if records.is_empty() => Ok(EMPTY_MESSAGE.to_string()),
        Format::Plain => Ok(plain(records)),
        Format::Table => Ok(table(records)),
    }
}

/// Render one record as `key: value` lines.
#[must_use]
pub fn detail(record: &StudentRecord) -> String {
    HEADERS
        .iter()
        .zip(record.field_values())
        .map(|(header, value)| format!("{header:<11} {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn plain(records: &[&StudentRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "{} | {} | {} | {} | {} | {} | {}",
                r.id, r.full_name, r.gender, r.email, r.program, r.year_level, r.university
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn table(records: &[&StudentRecord]) -> String {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for record in records {
        for (width, value) in widths.iter_mut().zip(record.field_values()) {
            *width = (*width).max(value.chars().count());
        }
    }

    let row = |cells: [&str; 7]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(row(HEADERS));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(records.iter().map(|r| row(r.field_values())));
    lines.join("\n")
}
