//! Configuration management for fleetlog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "fleetlog";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "logbook.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLEETLOG_`)
/// 2. TOML config file at `~/.config/fleetlog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// The vehicles the logbook knows about.
    pub fleet: FleetConfig,
    /// Write-time validation policy.
    pub validation: ValidationConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/fleetlog/logbook.db`
    pub database_path: Option<PathBuf>,
}

/// Fleet configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Vehicle identifiers, in display order.
    pub vehicles: Vec<String>,
}

/// Validation applied when an entry is submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Refuse to store an entry whose last service reading is ahead of its
    /// end odometer. When off, the entry is stored and flagged instead.
    pub reject_service_regression: bool,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            vehicles: vec![
                "Vehicle 1".to_string(),
                "Vehicle 2".to_string(),
                "Vehicle 3".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration from all sources, reading the TOML layer from
    /// `config_path` or the default location.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        // Later providers override earlier ones
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLEETLOG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the fleet is empty, or contains blank or duplicate
    /// vehicle names.
    pub fn validate(&self) -> Result<()> {
        if self.fleet.vehicles.is_empty() {
            return Err(Error::ConfigValidation {
                message: "fleet.vehicles must list at least one vehicle".to_string(),
            });
        }

        for (i, vehicle) in self.fleet.vehicles.iter().enumerate() {
            if vehicle.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("fleet.vehicles[{i}] is blank"),
                });
            }
            if self.fleet.vehicles[..i].contains(vehicle) {
                return Err(Error::ConfigValidation {
                    message: format!("duplicate vehicle in fleet.vehicles: {vehicle}"),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// The configured vehicles, in display order.
    #[must_use]
    pub fn vehicles(&self) -> &[String] {
        &self.fleet.vehicles
    }

    /// Check whether a vehicle is part of the fleet.
    #[must_use]
    pub fn is_known_vehicle(&self, vehicle: &str) -> bool {
        self.fleet.vehicles.iter().any(|v| v == vehicle)
    }

    /// Resolve a vehicle name against the fleet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVehicle`] if the vehicle is not configured.
    pub fn require_vehicle(&self, vehicle: &str) -> Result<()> {
        if self.is_known_vehicle(vehicle) {
            Ok(())
        } else {
            Err(Error::unknown_vehicle(vehicle))
        }
    }
}
