//! `boatreg` - CLI for boatregistry
//!
//! This binary looks up, lists and counts boats in the registry, and inspects
//! the configuration it would use to reach the spreadsheet.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use boatregistry::cli::{
    Cli, Command, ConfigCommand, CountCommand, GetCommand, ListCommand, OutputFormat,
};
use boatregistry::{init_logging, BoatField, BoatPage, BoatRegistry, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match cli.command {
        Command::Get(cmd) => {
            let config = load_config(cli.config.as_ref())?;
            handle_get(&config, &cmd).await
        }
        Command::List(cmd) => {
            let config = load_config(cli.config.as_ref())?;
            handle_list(&config, &cmd).await
        }
        Command::Count(cmd) => {
            let config = load_config(cli.config.as_ref())?;
            handle_count(&config, &cmd).await
        }
        Command::Columns => {
            handle_columns();
            Ok(())
        }
        Command::Config(config_cmd) => handle_config(cli.config.as_ref(), config_cmd),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path.cloned()).context("failed to load configuration")
}

async fn handle_get(config: &Config, cmd: &GetCommand) -> anyhow::Result<()> {
    let registry = BoatRegistry::from_config(config)?;
    let Some(boat) = registry.get_boat_by_id(&cmd.id).await? else {
        if cmd.format == OutputFormat::Json {
            println!("null");
            return Ok(());
        }
        bail!("boat \"{}\" not found", cmd.id.trim());
    };

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&boat)?),
        OutputFormat::Plain => {
            for field in BoatField::all() {
                println!("{}: {}", field.name(), boat.field(field));
            }
            println!("url: {}", boat.public_url(&config.app.public_url));
        }
        OutputFormat::Table => {
            let width = BoatField::all()
                .map(|f| f.header_label().chars().count())
                .max()
                .unwrap_or(0);
            for field in BoatField::all() {
                println!("{:<width$}  {}", field.header_label(), boat.field(field));
            }
            println!();
            println!("{}", boat.public_url(&config.app.public_url));
        }
    }
    Ok(())
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let registry = BoatRegistry::from_config(config)?;
    let page = registry.get_boats(&cmd.query()).await?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
        OutputFormat::Plain => {
            for boat in &page.boats {
                println!("{}\t{}\t{}", boat.id, boat.boat_number, boat.owner_name);
            }
        }
        OutputFormat::Table => print_table(&page),
    }
    Ok(())
}

fn print_table(page: &BoatPage) {
    println!(
        "{:<6} {:<16} {:<28} {:<14} {:<12}",
        "ID", "BOAT NUMBER", "OWNER", "DISTRICT", "EXPIRES"
    );
    println!("{}", "-".repeat(80));
    for boat in &page.boats {
        println!(
            "{:<6} {:<16} {:<28} {:<14} {:<12}",
            boat.id, boat.boat_number, boat.owner_name, boat.district, boat.inspection_expiry_date
        );
    }
    println!();
    println!(
        "Page {}/{} ({} boats, {} per page)",
        page.page, page.total_pages, page.total, page.limit
    );
}

async fn handle_count(config: &Config, cmd: &CountCommand) -> anyhow::Result<()> {
    let registry = BoatRegistry::from_config(config)?;
    let total = registry.total_count().await?;

    if cmd.json {
        println!("{}", serde_json::json!({ "total": total }));
    } else {
        println!("{total}");
    }
    Ok(())
}

fn handle_columns() {
    println!("{:<6} {:<6} {:<24} HEADER", "INDEX", "COLUMN", "FIELD");
    for field in BoatField::all() {
        println!(
            "{:<6} {:<6} {:<24} {}",
            field.column_index(),
            field.column_letter(),
            field.name(),
            field.header_label()
        );
    }
}

fn handle_config(path: Option<&PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(path)?;
            if json {
                // private_key is skipped by serialization
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                let sheets = &config.sheets;
                let key_state = if sheets.private_key.is_some() { "set" } else { "not set" };

                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Sheets]");
                println!(
                    "  Service account:    {}",
                    sheets.service_account_email.as_deref().unwrap_or("(not set)")
                );
                println!("  Private key:        {key_state}");
                println!(
                    "  Sheet id:           {}",
                    sheets.sheet_id.as_deref().unwrap_or("(not set)")
                );
                println!("  Sheet name:         {}", sheets.sheet_name);
                println!("  Header row:         {}", sheets.header_row);
                println!("  API base URL:       {}", sheets.api_base_url);
                println!("  Request timeout:    {}s", sheets.request_timeout_secs);
                println!();
                println!("[Data]");
                println!("  Mock data:          {}", config.data.use_mock_data);
                println!("  Mock count:         {}", config.data.mock_count);
                println!();
                println!("[Cache]");
                println!("  TTL:                {}s", config.cache.ttl_secs);
                println!();
                println!("[App]");
                println!("  Public URL:         {}", config.app.public_url);
            }
        }
        ConfigCommand::Path => {
            let path = path.cloned().unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or_else(|| path.cloned())
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(config) => {
                    let missing = config.sheets.missing_credentials();
                    if !config.data.use_mock_data && !missing.is_empty() {
                        println!(
                            "Configuration is valid, but live mode lacks: {}",
                            missing.join(", ")
                        );
                    } else {
                        println!("Configuration is valid.");
                    }
                }
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
