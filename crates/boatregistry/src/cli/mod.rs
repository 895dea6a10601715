//! Command-line interface for boatregistry.
//!
//! This module provides the CLI structure for the `boatreg` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, CountCommand, GetCommand, ListCommand, OutputFormat};

use crate::logging::Verbosity;

/// boatreg - Query the boat registry
///
/// Reads the fishing boat registry from its spreadsheet (or from generated
/// mock data) and prints single records, paginated listings or counts.
#[derive(Debug, Parser)]
#[command(name = "boatreg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

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
    /// Show one boat by serial number
    Get(GetCommand),

    /// List boats with optional search
    List(ListCommand),

    /// Print the total number of registry rows
    Count(CountCommand),

    /// Print the spreadsheet column layout
    Columns,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
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
            verbose,
            quiet,
            command: Command::Columns,
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "boatreg");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_get() {
        let cli = Cli::try_parse_from(["boatreg", "get", "17"]).unwrap();
        match cli.command {
            Command::Get(cmd) => {
                assert_eq!(cmd.id, "17");
                assert_eq!(cmd.format, OutputFormat::Plain);
            }
            other => panic!("expected get, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["boatreg", "list"]).unwrap();
        match cli.command {
            Command::List(cmd) => {
                assert_eq!(cmd.page, 1);
                assert_eq!(cmd.limit, 20);
                assert!(cmd.search.is_none());
                assert_eq!(cmd.format, OutputFormat::Table);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_with_options() {
        let cli = Cli::try_parse_from([
            "boatreg", "list", "--page", "3", "--limit", "5", "--search", "ĐNa", "-f", "json",
        ])
        .unwrap();
        match cli.command {
            Command::List(cmd) => {
                assert_eq!(cmd.page, 3);
                assert_eq!(cmd.limit, 5);
                assert_eq!(cmd.search.as_deref(), Some("ĐNa"));
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_count_and_columns() {
        let cli = Cli::try_parse_from(["boatreg", "count", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Count(CountCommand { json: true })));

        let cli = Cli::try_parse_from(["boatreg", "columns"]).unwrap();
        assert!(matches!(cli.command, Command::Columns));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["boatreg", "config", "validate", "--file", "/tmp/b.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["boatreg", "-c", "/custom/config.toml", "-vv", "count"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["boatreg", "count", "-q"]).unwrap();
        assert!(cli.quiet);
    }
}
