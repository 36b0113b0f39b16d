//! Error types for fleetlog.
//!
//! This module defines all error types used throughout the fleetlog crate,
//! covering form input problems, metric conditions, storage failures and
//! configuration issues.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for fleetlog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Input Errors ===
    /// A required form field was absent at submit time.
    #[error("missing input: {field}")]
    MissingInput {
        /// Name of the absent field.
        field: &'static str,
    },

    /// The vehicle is not part of the configured fleet.
    #[error("unknown vehicle '{vehicle}'")]
    UnknownVehicle {
        /// The identifier that was given.
        vehicle: String,
    },

    /// A date could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The raw value that failed to parse.
        value: String,
    },

    // === Metric Errors ===
    /// The last service reading is ahead of the current odometer.
    #[error(
        "last service KM reading ({last_service_odometer}) is greater than current KM reading ({current_odometer})"
    )]
    InvalidServiceReading {
        /// Odometer reading at the end of the entry.
        current_odometer: i64,
        /// Odometer reading at the most recent service.
        last_service_odometer: i64,
    },

    /// Fuel efficiency was requested with zero fuel used.
    #[error("fuel used must be non-zero to compute fuel efficiency")]
    DivisionByZero,

    /// A reading cannot take part in a calculation.
    #[error("invalid {field} reading: {value}")]
    InvalidReading {
        /// Which reading was rejected.
        field: &'static str,
        /// The offending value, as given.
        value: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for fleetlog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing input error for the named form field.
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::MissingInput { field }
    }

    /// Create an unknown vehicle error.
    #[must_use]
    pub fn unknown_vehicle(vehicle: impl Into<String>) -> Self {
        Self::UnknownVehicle {
            vehicle: vehicle.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_display() {
        let err = Error::missing("fuel_used");
        assert_eq!(err.to_string(), "missing input: fuel_used");
        assert!(matches!(err, Error::MissingInput { field: "fuel_used" }));
    }

    #[test]
    fn test_unknown_vehicle_display() {
        let err = Error::unknown_vehicle("Vehicle 9");
        assert_eq!(err.to_string(), "unknown vehicle 'Vehicle 9'");
    }

    #[test]
    fn test_invalid_service_reading_display() {
        let err = Error::InvalidServiceReading {
            current_odometer: 4000,
            last_service_odometer: 5000,
        };
        let msg = err.to_string();
        assert!(msg.contains("5000"));
        assert!(msg.contains("4000"));
        assert!(msg.contains("greater than"));
    }

    #[test]
    fn test_division_by_zero_display() {
        assert!(Error::DivisionByZero.to_string().contains("non-zero"));
    }

    #[test]
    fn test_invalid_date_display() {
        let err = Error::InvalidDate {
            value: "01-06-2023".to_string(),
        };
        assert!(err.to_string().contains("01-06-2023"));
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_database_open_error_display() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err = Error::DatabaseOpen {
                path: PathBuf::from("/nonexistent/path/db.sqlite"),
                source: sqlite_err,
            };
            assert!(err.to_string().contains("/nonexistent/path/db.sqlite"));
        }
    }

    #[test]
    fn test_invalid_reading_display() {
        let err = Error::InvalidReading {
            field: "fuel_used",
            value: "NaN".to_string(),
        };
        assert_eq!(err.to_string(), "invalid fuel_used reading: NaN");
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "fleet.vehicles must not be empty".to_string(),
        };
        assert!(err.to_string().contains("fleet.vehicles"));
    }
}
