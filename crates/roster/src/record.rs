//! Core record types for roster.
//!
//! [`StudentRecord`] is what the store persists and the filter engine reads.
//! [`StudentPayload`] is the inbound shape of add/update requests; it turns
//! into a record only after validation.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Accepts `local@domain.tld` with no whitespace and a single `@`.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Recorded gender of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// The canonical string form, as stored in the document.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            other => Err(Error::validation(format!(
                "gender must be 'Male' or 'Female', got '{other}'"
            ))),
        }
    }
}

/// One student's data.
///
/// `id` and `email` are unique across a collection; the store enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// User-supplied unique identifier.
    pub id: String,
    /// Full display name.
    pub full_name: String,
    /// Recorded gender.
    pub gender: Gender,
    /// Unique contact email.
    pub email: String,
    /// Degree program, e.g. `CS`.
    pub program: String,
    /// Year level, e.g. `2nd Year`.
    pub year_level: String,
    /// University name.
    pub university: String,
}

impl StudentRecord {
    /// String form of every field value, in declaration order.
    #[must_use]
    pub fn field_values(&self) -> [&str; 7] {
        [
            &self.id,
            &self.full_name,
            self.gender.as_str(),
            &self.email,
            &self.program,
            &self.year_level,
            &self.university,
        ]
    }
}

/// Inbound student data from a request body or the command line.
///
/// Every field is optional here so that a missing field is reported as a
/// validation error naming the field instead of a body parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    /// Unique identifier; taken from the path on update.
    pub id: Option<String>,
    /// Full display name.
    pub full_name: Option<String>,
    /// `Male` or `Female`.
    pub gender: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Degree program.
    pub program: Option<String>,
    /// Year level.
    pub year_level: Option<String>,
    /// University name.
    pub university: Option<String>,
}

impl StudentPayload {
    /// Validate the payload as a new record. The `id` field is required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming every missing field, or describing
    /// the first malformed one.
    pub fn into_record(self) -> Result<StudentRecord> {
        let mut missing = Vec::new();
        let id = required(self.id.clone(), "id", &mut missing);
        self.build(id, missing)
    }

    /// Validate the payload as a replacement for the record with `id`.
    ///
    /// The body may omit `id`; if it carries one, it must equal `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a field is missing or malformed, or if
    /// the body id disagrees with `id`.
    pub fn into_record_with_id(self, id: &str) -> Result<StudentRecord> {
        if let Some(body_id) = self.id.as_deref().map(str::trim) {
            if !body_id.is_empty() && body_id != id {
                return Err(Error::validation(format!(
                    "id in body ('{body_id}') does not match '{id}'"
                )));
            }
        }
        self.build(id.to_string(), Vec::new())
    }

    fn build(self, id: String, mut missing: Vec<&'static str>) -> Result<StudentRecord> {
        let full_name = required(self.full_name, "fullName", &mut missing);
        let gender = required(self.gender, "gender", &mut missing);
        let email = required(self.email, "email", &mut missing);
        let program = required(self.program, "program", &mut missing);
        let year_level = required(self.year_level, "yearLevel", &mut missing);
        let university = required(self.university, "university", &mut missing);

        if !missing.is_empty() {
            return Err(Error::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let gender = gender.parse()?;
        if !email_pattern()?.is_match(&email) {
            return Err(Error::validation(format!("invalid email address '{email}'")));
        }

        Ok(StudentRecord {
            id,
            full_name,
            gender,
            email,
            program,
            year_level,
            university,
        })
    }
}

/// Trim `value`; record `name` as missing if it is absent or blank.
fn required(value: Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

fn email_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = PATTERN.get() {
        return Ok(re);
    }
    let re = Regex::new(EMAIL_PATTERN)
        .map_err(|e| Error::internal(format!("invalid email pattern: {e}")))?;
    Ok(PATTERN.get_or_init(|| re))
}
