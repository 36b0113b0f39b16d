//! `fleetlog` - CLI for the vehicle logbook
//!
//! Each invocation opens the logbook, handles one action and closes it.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::Serialize;

use fleetlog::cli::{
    resolve_as_of, AddCommand, Cli, Command, ConfigCommand, FleetCommand, OutputFormat,
    ShowCommand, StatusCommand, VehicleCommand,
};
use fleetlog::{init_logging, Config, LogStore, RequestHandler};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    if let Some(db) = cli.db.clone() {
        config.storage.database_path = Some(db);
    }

    let today = Local::now().date_naive();

    match cli.command {
        Command::Add(cmd) => handle_add(&config, &cmd, today),
        Command::Select(cmd) => handle_select(&config, &cmd),
        Command::Show(cmd) => handle_show(&config, &cmd, today),
        Command::History(cmd) => handle_history(&config, &cmd),
        Command::Fleet(cmd) => handle_fleet(&config, &cmd, today),
        Command::Status(cmd) => handle_status(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> Result<LogStore> {
    let path = config.database_path();
    LogStore::open(&path).with_context(|| format!("opening logbook at {}", path.display()))
}

fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    plain: impl FnOnce(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Plain => print!("{}", plain(value)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn handle_add(config: &Config, cmd: &AddCommand, today: NaiveDate) -> Result<()> {
    let form = cmd.to_form(today)?;
    let store = open_store(config)?;
    let outcome = RequestHandler::new(&store, config)
        .submit_entry(form, today)
        .context("recording entry")?;
    emit(cmd.format, &outcome, fleetlog::SubmitOutcome::render)
}

fn handle_select(config: &Config, cmd: &VehicleCommand) -> Result<()> {
    let store = open_store(config)?;
    let prefill = RequestHandler::new(&store, config).select_vehicle(&cmd.vehicle)?;
    emit(cmd.format, &prefill, fleetlog::Prefill::render)
}

fn handle_show(config: &Config, cmd: &ShowCommand, today: NaiveDate) -> Result<()> {
    let as_of = resolve_as_of(cmd.as_of.as_deref(), today)?;
    let store = open_store(config)?;
    let panel = RequestHandler::new(&store, config).view_vehicle(&cmd.vehicle, as_of)?;
    emit(cmd.format, &panel, fleetlog::VehiclePanel::render)
}

fn handle_history(config: &Config, cmd: &VehicleCommand) -> Result<()> {
    let store = open_store(config)?;
    let chart = RequestHandler::new(&store, config).view_history(&cmd.vehicle)?;
    emit(cmd.format, &chart, fleetlog::gauge::Chart::render)
}

fn handle_fleet(config: &Config, cmd: &FleetCommand, today: NaiveDate) -> Result<()> {
    let as_of = resolve_as_of(cmd.as_of.as_deref(), today)?;
    let store = open_store(config)?;
    let overview = RequestHandler::new(&store, config).view_fleet(as_of)?;
    emit(cmd.format, &overview, fleetlog::FleetOverview::render)
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.stats()?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let date_or_dash = |d: Option<NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());

    println!("fleetlog status");
    println!("---------------");
    println!("Database:      {}", store.path().display());
    println!("Size:          {} bytes", stats.db_size_bytes);
    println!("Entries:       {}", stats.total_entries);
    println!("Oldest entry:  {}", date_or_dash(stats.oldest_entry));
    println!("Newest entry:  {}", date_or_dash(stats.newest_entry));
    for vehicle in config.vehicles() {
        println!("  {vehicle:<12} {}", store.count_for(vehicle)?);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Fleet]");
                for vehicle in config.vehicles() {
                    println!("  {vehicle}");
                }
                println!();
                println!("[Validation]");
                println!(
                    "  Reject service regression: {}",
                    config.validation.reject_service_regression
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
