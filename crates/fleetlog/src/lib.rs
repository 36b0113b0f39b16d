//! `fleetlog` - A vehicle logbook with fuel, service and road-tax dashboards
//!
//! Entries are appended to an `SQLite` logbook per vehicle. From them the
//! crate derives fuel efficiency, distance since the last service and days
//! until road tax is due, and presents them as gauges and charts.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod entry;
pub mod error;
pub mod gauge;
pub mod handler;
pub mod logging;
pub mod metrics;
pub mod storage;

pub use config::Config;
pub use dashboard::{FleetOverview, VehiclePanel};
pub use entry::{EntryForm, HistoryPoint, NewEntry, VehicleLogEntry};
pub use error::{Error, Result};
pub use handler::{Prefill, RequestHandler, SubmitOutcome};
pub use logging::init_logging;
pub use metrics::{ServiceUrgency, TaxStatus};
pub use storage::{LogStore, StoreStats};
