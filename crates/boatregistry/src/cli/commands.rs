//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::query::{BoatQuery, DEFAULT_PAGE_SIZE};

/// Look up a single boat.
#[derive(Debug, Args)]
pub struct GetCommand {
    /// Serial number of the boat
    pub id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// List boats page by page.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Boats per page
    #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: u32,

    /// Match registration number or owner name
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ListCommand {
    /// Build the registry query for these arguments.
    #[must_use]
    pub fn query(&self) -> BoatQuery {
        BoatQuery {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
        }
    }
}

/// Count command arguments.
#[derive(Debug, Args)]
pub struct CountCommand {
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

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
