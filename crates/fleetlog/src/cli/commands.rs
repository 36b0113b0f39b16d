//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Add command arguments: the logbook entry form.
///
/// Every field is optional here so that a blank field is reported the same
/// way the form reports it, without writing anything.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Vehicle the entry is for
    #[arg(long)]
    pub vehicle: Option<String>,

    /// Entry date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Odometer reading at the start
    #[arg(long, value_name = "KM", value_parser = clap::value_parser!(i64).range(0..))]
    pub start_km: Option<i64>,

    /// Odometer reading at the end
    #[arg(long, value_name = "KM", value_parser = clap::value_parser!(i64).range(0..))]
    pub end_km: Option<i64>,

    /// Fuel used in liters
    #[arg(long, value_name = "LITERS")]
    pub fuel: Option<f64>,

    /// Odometer reading at the last service
    #[arg(long, value_name = "KM", value_parser = clap::value_parser!(i64).range(0..))]
    pub last_service_km: Option<i64>,

    /// Date of the last road-tax payment, YYYY-MM-DD (defaults to today)
    #[arg(long, value_name = "DATE")]
    pub tax_paid: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments for commands that target one vehicle.
#[derive(Debug, Args)]
pub struct VehicleCommand {
    /// Vehicle identifier, e.g. "Vehicle 1"
    pub vehicle: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments: one vehicle's dashboard.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Vehicle identifier, e.g. "Vehicle 1"
    pub vehicle: String,

    /// Compute countdowns as of this date instead of today
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Fleet command arguments.
#[derive(Debug, Args)]
pub struct FleetCommand {
    /// Compute countdowns as of this date instead of today
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
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
    /// Text gauges and charts
    #[default]
    Plain,
    /// JSON output
    Json,
}
