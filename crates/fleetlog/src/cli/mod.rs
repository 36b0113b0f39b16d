//! Command-line interface for fleetlog.
//!
//! Each subcommand is one user action: submit an entry, select a vehicle,
//! or look at a dashboard view.

mod commands;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, FleetCommand, OutputFormat, ShowCommand, StatusCommand,
    VehicleCommand,
};

use crate::entry::{parse_date, EntryForm};
use crate::error::Result;
use crate::logging::Verbosity;

/// fleetlog - Vehicle logbook and dashboard
///
/// Record odometer, fuel, service and road-tax entries per vehicle and
/// review fuel efficiency, service urgency and tax countdowns.
#[derive(Debug, Parser)]
#[command(name = "fleetlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the logbook database (overrides configuration)
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

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
    /// Record a logbook entry
    Add(AddCommand),

    /// Select a vehicle and show the values to prefill the form with
    Select(VehicleCommand),

    /// Show the dashboard for one vehicle
    Show(ShowCommand),

    /// Show the fuel efficiency history for one vehicle
    History(VehicleCommand),

    /// Show the dashboard for all vehicles
    Fleet(FleetCommand),

    /// Show logbook statistics
    Status(StatusCommand),

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

impl AddCommand {
    /// Build the entry form, defaulting both dates to `today`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidDate`] if a given date doesn't parse.
    pub fn to_form(&self, today: NaiveDate) -> Result<EntryForm> {
        let entry_date = self.date.as_deref().map(parse_date).transpose()?;
        let tax_paid = self.tax_paid.as_deref().map(parse_date).transpose()?;
        Ok(EntryForm {
            vehicle_id: self.vehicle.clone(),
            entry_date: Some(entry_date.unwrap_or(today)),
            start_odometer: self.start_km,
            end_odometer: self.end_km,
            fuel_used_liters: self.fuel,
            last_service_odometer: self.last_service_km,
            last_tax_payment_date: Some(tax_paid.unwrap_or(today)),
        })
    }
}

/// Resolve an optional `--as-of` date, falling back to `today`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidDate`] if the date doesn't parse.
pub fn resolve_as_of(as_of: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    Ok(as_of.map(parse_date).transpose()?.unwrap_or(today))
}
