//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::filter::FilterState;
use crate::record::{Gender, StudentPayload};
use crate::render::Format;

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Case-insensitive text matched against every field
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only this program ("all" for any)
    #[arg(long)]
    pub program: Option<String>,

    /// Only this gender ("all" for any)
    #[arg(long)]
    pub gender: Option<String>,

    /// Only this year level ("all" for any)
    #[arg(long)]
    pub year_level: Option<String>,

    /// Only this university ("all" for any)
    #[arg(long)]
    pub university: Option<String>,

    /// Also print aggregate counts
    #[arg(long)]
    pub stats: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ListCommand {
    /// The filter state described by the flags.
    #[must_use]
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            search: self.search.clone().unwrap_or_default(),
            program: self.program.clone().into(),
            gender: self.gender.clone().into(),
            year_level: self.year_level.clone().into(),
            university: self.university.clone().into(),
        }
    }
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the student
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Fields shared by add and update.
#[derive(Debug, Args)]
pub struct RecordFields {
    /// Full name
    #[arg(long)]
    pub full_name: String,

    /// Gender
    #[arg(long, value_enum)]
    pub gender: GenderArg,

    /// Email address (must be unique)
    #[arg(long)]
    pub email: String,

    /// Degree program
    #[arg(long)]
    pub program: String,

    /// Year level
    #[arg(long)]
    pub year_level: String,

    /// University
    #[arg(long)]
    pub university: String,
}

impl RecordFields {
    /// Convert into a payload carrying `id`.
    #[must_use]
    pub fn into_payload(self, id: Option<String>) -> StudentPayload {
        StudentPayload {
            id,
            full_name: Some(self.full_name),
            gender: Some(Gender::from(self.gender).to_string()),
            email: Some(self.email),
            program: Some(self.program),
            year_level: Some(self.year_level),
            university: Some(self.university),
        }
    }
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Unique student id
    #[arg(long)]
    pub id: String,

    /// Record fields
    #[command(flatten)]
    pub fields: RecordFields,
}

/// Update command arguments.
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Id of the student to replace
    pub id: String,

    /// Replacement fields
    #[command(flatten)]
    pub fields: RecordFields,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Id of the student to remove
    pub id: String,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Gender argument for add/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    /// Male
    Male,
    /// Female
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Self::Male,
            GenderArg::Female => Self::Female,
        }
    }
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Plain => Self::Plain,
            OutputFormat::Table => Self::Table,
            OutputFormat::Json => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Selection;

    fn fields() -> RecordFields {
        RecordFields {
            full_name: "Ada Lovelace".to_string(),
            gender: GenderArg::Female,
            email: "ada@example.edu".to_string(),
            program: "CS".to_string(),
            year_level: "1st Year".to_string(),
            university: "State University".to_string(),
        }
    }

    #[test]
    fn test_gender_arg_conversion() {
        assert_eq!(Gender::from(GenderArg::Male), Gender::Male);
        assert_eq!(Gender::from(GenderArg::Female), Gender::Female);
    }

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(Format::from(OutputFormat::Plain), Format::Plain);
        assert_eq!(Format::from(OutputFormat::Table), Format::Table);
        assert_eq!(Format::from(OutputFormat::Json), Format::Json);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_record_fields_into_valid_record() {
        let record = fields()
            .into_payload(Some("S1".to_string()))
            .into_record()
            .unwrap();
        assert_eq!(record.id, "S1");
        assert_eq!(record.gender, Gender::Female);
    }

    #[test]
    fn test_list_command_filter_state() {
        let cmd = ListCommand {
            search: Some("ada".to_string()),
            program: Some("CS".to_string()),
            gender: None,
            year_level: Some("all".to_string()),
            university: None,
            stats: false,
            format: OutputFormat::Table,
        };
        let state = cmd.filter_state();
        assert_eq!(state.search, "ada");
        assert_eq!(state.program, Selection::Only("CS".to_string()));
        assert!(state.gender.is_all());
        assert!(state.year_level.is_all());
    }

    #[test]
    fn test_list_command_without_flags_is_unfiltered() {
        let cmd = ListCommand {
            search: None,
            program: None,
            gender: None,
            year_level: None,
            university: None,
            stats: true,
            format: OutputFormat::Json,
        };
        assert!(cmd.filter_state().is_unfiltered());
    }
}
