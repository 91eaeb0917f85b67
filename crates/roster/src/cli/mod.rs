//! Command-line interface for roster.
//!
//! This module provides the CLI structure for the `roster` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, GenderArg, ListCommand, OutputFormat, RecordFields,
    RemoveCommand, ServeCommand, ShowCommand, StatsCommand, UpdateCommand,
};

use crate::logging::Verbosity;

/// roster - Manage a student roster
///
/// Serves a REST API over a JSON document of student records, and lists,
/// filters and edits the same document from the command line.
#[derive(Debug, Parser)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the student data file (overrides config)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the REST API server
    Serve(ServeCommand),

    /// List students, optionally filtered
    List(ListCommand),

    /// Show one student
    Show(ShowCommand),

    /// Add a student
    Add(AddCommand),

    /// Replace a student's fields
    Update(UpdateCommand),

    /// Remove a student
    Remove(RemoveCommand),

    /// Show aggregate counts
    Stats(StatsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    /// Whether the command runs against the loaded configuration.
    ///
    /// `config path` and `config validate` must work even when the
    /// configuration file itself is broken.
    #[must_use]
    pub fn uses_loaded_config(&self) -> bool {
        !matches!(
            self,
            Self::Config(ConfigCommand::Path | ConfigCommand::Validate { .. })
        )
    }
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            data_file: None,
            verbose,
            quiet,
            command: Command::Stats(StatsCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "roster");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(3, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["roster", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve(cmd) => {
                assert_eq!(cmd.port, Some(8080));
                assert!(cmd.host.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_filters() {
        let args = [
            "roster",
            "list",
            "--search",
            "ada",
            "--program",
            "CS",
            "--year-level",
            "1st Year",
            "-f",
            "json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::List(cmd) => {
                assert_eq!(cmd.search.as_deref(), Some("ada"));
                assert_eq!(cmd.program.as_deref(), Some("CS"));
                assert_eq!(cmd.year_level.as_deref(), Some("1st Year"));
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_add() {
        let args = [
            "roster",
            "add",
            "--id",
            "S1",
            "--full-name",
            "Ada Lovelace",
            "--gender",
            "female",
            "--email",
            "ada@example.edu",
            "--program",
            "CS",
            "--year-level",
            "1st Year",
            "--university",
            "State University",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Add(cmd) => {
                assert_eq!(cmd.id, "S1");
                assert_eq!(cmd.fields.gender, GenderArg::Female);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_requires_every_field() {
        let args = ["roster", "add", "--id", "S1", "--full-name", "Ada"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_remove() {
        let cli = Cli::try_parse_from(["roster", "remove", "S1"]).unwrap();
        assert!(matches!(cli.command, Command::Remove(RemoveCommand { ref id }) if id == "S1"));
    }

    #[test]
    fn test_parse_global_data_file() {
        let args = ["roster", "stats", "--data-file", "/tmp/students.json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/students.json")));
    }

    #[test]
    fn test_parse_with_config() {
        let args = ["roster", "-c", "/custom/config.toml", "stats"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_config_inspection_skips_loading() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().command;

        assert!(!parse(&["roster", "config", "validate"]).uses_loaded_config());
        assert!(
            !parse(&["roster", "config", "validate", "--file", "x.toml"]).uses_loaded_config()
        );
        assert!(!parse(&["roster", "config", "path"]).uses_loaded_config());
        assert!(parse(&["roster", "config", "show"]).uses_loaded_config());
        assert!(parse(&["roster", "stats"]).uses_loaded_config());
        assert!(parse(&["roster", "serve"]).uses_loaded_config());
    }

    #[test]
    fn test_parse_with_quiet() {
        let cli = Cli::try_parse_from(["roster", "-q", "stats"]).unwrap();
        assert!(cli.quiet);
    }
}
