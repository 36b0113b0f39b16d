//! Storage layer for fleetlog.
//!
//! This module provides the `SQLite`-backed, append-only vehicle logbook.
//! Entries can be added and read back per vehicle, but never updated or
//! deleted.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info};

use crate::entry::{HistoryPoint, NewEntry, VehicleLogEntry, DATE_FORMAT};
use crate::error::{Error, Result};
use crate::metrics;

const ENTRY_COLUMNS: &str = "id, vehicle_id, start_odometer, end_odometer, fuel_used_liters, \
     fuel_efficiency_km_per_liter, last_service_odometer, entry_date, last_tax_payment_date";

/// Append-only store of vehicle log entries.
///
/// Owns its connection; dropping the store closes it. Handlers receive a
/// borrowed store rather than reaching for a process-wide handle.
#[derive(Debug)]
pub struct LogStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl LogStore {
    /// Open or create a logbook database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening logbook at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        // Initialize schema
        migrations::initialize_schema(&conn)?;

        info!("Logbook opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry, computing and storing its fuel efficiency.
    ///
    /// Returns the id assigned to the new row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionByZero`] when no fuel was used,
    /// [`Error::InvalidReading`] for a reading the efficiency can't be
    /// computed from, or a storage error if the insert fails.
    pub fn append(&self, entry: &NewEntry) -> Result<i64> {
        // Efficiency is derived once here and never recomputed
        let efficiency = metrics::fuel_efficiency(
            entry.start_odometer,
            entry.end_odometer,
            entry.fuel_used_liters,
        )?;

        self.conn.execute(
            r"
            INSERT INTO vehicle_log (
                vehicle_id, start_odometer, end_odometer, fuel_used_liters,
                fuel_efficiency_km_per_liter, last_service_odometer,
                entry_date, last_tax_payment_date
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
            params![
                entry.vehicle_id,
                entry.start_odometer,
                entry.end_odometer,
                entry.fuel_used_liters,
                efficiency,
                entry.last_service_odometer,
                format_date(entry.entry_date),
                format_date(entry.last_tax_payment_date),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(
            "Appended entry {} for {} ({:.2} km/l)",
            id, entry.vehicle_id, efficiency
        );
        Ok(id)
    }

    /// Get an entry by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<VehicleLogEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM vehicle_log WHERE id = ?1");
        let entry = self
            .conn
            .query_row(&sql, [id], Self::row_to_entry)
            .optional()?;
        Ok(entry)
    }

    /// The entry with the latest `entry_date` for a vehicle.
    ///
    /// When several entries share that date, the most recently appended one
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn latest_for(&self, vehicle_id: &str) -> Result<Option<VehicleLogEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM vehicle_log WHERE vehicle_id = ?1 \
             ORDER BY entry_date DESC, id DESC LIMIT 1"
        );
        let entry = self
            .conn
            .query_row(&sql, [vehicle_id], Self::row_to_entry)
            .optional()?;
        Ok(entry)
    }

    /// Fuel efficiency history for a vehicle, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn history_for(&self, vehicle_id: &str) -> Result<Vec<HistoryPoint>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT fuel_efficiency_km_per_liter, entry_date
            FROM vehicle_log WHERE vehicle_id = ?1
            ORDER BY entry_date ASC, id ASC
            ",
        )?;

        let points = stmt
            .query_map([vehicle_id], |row| {
                Ok(HistoryPoint {
                    fuel_efficiency_km_per_liter: row.get(0)?,
                    entry_date: parse_date_column(row, 1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(points)
    }

    /// Count all entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM vehicle_log", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count entries for one vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count_for(&self, vehicle_id: &str) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM vehicle_log WHERE vehicle_id = ?1",
            [vehicle_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get logbook statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let total_entries = self.count()?;

        let (oldest, newest): (Option<String>, Option<String>) = self.conn.query_row(
            "SELECT MIN(entry_date), MAX(entry_date) FROM vehicle_log",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stmt = self.conn.prepare(
            r"
            SELECT vehicle_id, COUNT(*) FROM vehicle_log
            GROUP BY vehicle_id ORDER BY vehicle_id
            ",
        )?;
        let vehicles = stmt
            .query_map([], |row| {
                Ok(VehicleCount {
                    vehicle_id: row.get(0)?,
                    entries: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // In-memory databases have no file to measure
        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StoreStats {
            total_entries,
            vehicles,
            oldest_entry: oldest.and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()),
            newest_entry: newest.and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()),
            db_size_bytes,
        })
    }

    /// Convert a database row to a [`VehicleLogEntry`].
    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<VehicleLogEntry> {
        Ok(VehicleLogEntry {
            id: row.get(0)?,
            vehicle_id: row.get(1)?,
            start_odometer: row.get(2)?,
            end_odometer: row.get(3)?,
            fuel_used_liters: row.get(4)?,
            fuel_efficiency_km_per_liter: row.get(5)?,
            last_service_odometer: row.get(6)?,
            entry_date: parse_date_column(row, 7)?,
            last_tax_payment_date: parse_date_column(row, 8)?,
        })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Number of entries recorded for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleCount {
    /// The vehicle.
    pub vehicle_id: String,
    /// Entries stored for it.
    pub entries: i64,
}

/// Statistics about the logbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Total number of entries stored.
    pub total_entries: i64,
    /// Entry counts per vehicle, ordered by vehicle id.
    pub vehicles: Vec<VehicleCount>,
    /// Earliest entry date.
    pub oldest_entry: Option<NaiveDate>,
    /// Latest entry date.
    pub newest_entry: Option<NaiveDate>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> LogStore {
        LogStore::open_in_memory().expect("failed to create test store")
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn entry(vehicle: &str, entry_date: &str, start: i64, end: i64, fuel: f64) -> NewEntry {
        NewEntry {
            vehicle_id: vehicle.to_string(),
            start_odometer: start,
            end_odometer: end,
            fuel_used_liters: fuel,
            last_service_odometer: start,
            entry_date: date(entry_date),
            last_tax_payment_date: date("2023-01-01"),
        }
    }

    #[test]
    fn test_open_in_memory() {
        assert!(LogStore::open_in_memory().is_ok());
    }

    #[test]
    fn test_append_and_get() {
        let store = create_test_store();
        let id = store
            .append(&entry("Vehicle 1", "2023-06-01", 1000, 1500, 25.0))
            .unwrap();

        let stored = store.get(id).unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.vehicle_id, "Vehicle 1");
        assert_eq!(stored.start_odometer, 1000);
        assert_eq!(stored.end_odometer, 1500);
        assert!((stored.fuel_efficiency_km_per_liter - 20.0).abs() < f64::EPSILON);
        assert_eq!(stored.entry_date, date("2023-06-01"));
        assert_eq!(stored.last_tax_payment_date, date("2023-01-01"));
    }

    #[test]
    fn test_append_ids_increase() {
        let store = create_test_store();
        let a = store
            .append(&entry("Vehicle 1", "2023-06-01", 0, 100, 10.0))
            .unwrap();
        let b = store
            .append(&entry("Vehicle 2", "2023-06-01", 0, 100, 10.0))
            .unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_append_zero_fuel_is_rejected() {
        let store = create_test_store();
        let err = store
            .append(&entry("Vehicle 1", "2023-06-01", 1000, 1500, 0.0))
            .unwrap_err();
        assert!(matches!(err, Error::DivisionByZero));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_append_nan_fuel_is_a_domain_error() {
        let store = create_test_store();
        let err = store
            .append(&entry("Vehicle 1", "2023-06-01", 1000, 1500, f64::NAN))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReading { field: "fuel_used", .. }));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_get_nonexistent() {
        let store = create_test_store();
        assert!(store.get(99_999).unwrap().is_none());
    }

    #[test]
    fn test_latest_for_picks_max_entry_date() {
        let store = create_test_store();
        // Appended out of date order on purpose.
        store
            .append(&entry("Vehicle 1", "2023-03-01", 0, 100, 10.0))
            .unwrap();
        store
            .append(&entry("Vehicle 1", "2023-09-01", 200, 400, 10.0))
            .unwrap();
        store
            .append(&entry("Vehicle 1", "2023-05-01", 100, 200, 10.0))
            .unwrap();

        let latest = store.latest_for("Vehicle 1").unwrap().unwrap();
        assert_eq!(latest.entry_date, date("2023-09-01"));
        assert_eq!(latest.end_odometer, 400);
    }

    #[test]
    fn test_latest_for_same_date_prefers_newest_row() {
        let store = create_test_store();
        store
            .append(&entry("Vehicle 1", "2023-06-01", 0, 100, 10.0))
            .unwrap();
        let second = store
            .append(&entry("Vehicle 1", "2023-06-01", 100, 300, 10.0))
            .unwrap();

        let latest = store.latest_for("Vehicle 1").unwrap().unwrap();
        assert_eq!(latest.id, second);
    }

    #[test]
    fn test_latest_for_unrelated_vehicle_is_absent() {
        let store = create_test_store();
        store
            .append(&entry("Vehicle 1", "2023-06-01", 0, 100, 10.0))
            .unwrap();
        assert!(store.latest_for("Vehicle 2").unwrap().is_none());
    }

    #[test]
    fn test_latest_for_empty_store() {
        let store = create_test_store();
        assert!(store.latest_for("Vehicle 1").unwrap().is_none());
    }

    #[test]
    fn test_history_for_is_date_ordered() {
        let store = create_test_store();
        for d in ["2023-07-01", "2023-01-15", "2023-04-30", "2023-01-15"] {
            store.append(&entry("Vehicle 3", d, 0, 120, 10.0)).unwrap();
        }
        store
            .append(&entry("Vehicle 1", "2022-12-31", 0, 100, 10.0))
            .unwrap();

        let history = store.history_for("Vehicle 3").unwrap();
        assert_eq!(history.len(), 4);
        assert!(history
            .windows(2)
            .all(|w| w[0].entry_date <= w[1].entry_date));
        assert_eq!(history[0].entry_date, date("2023-01-15"));
        assert!((history[0].fuel_efficiency_km_per_liter - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_history_for_unknown_vehicle_is_empty() {
        let store = create_test_store();
        assert!(store.history_for("Vehicle 1").unwrap().is_empty());
    }

    #[test]
    fn test_history_for_is_idempotent() {
        let store = create_test_store();
        store
            .append(&entry("Vehicle 2", "2023-02-01", 0, 300, 20.0))
            .unwrap();
        store
            .append(&entry("Vehicle 2", "2023-01-01", 0, 200, 20.0))
            .unwrap();

        let first = store.history_for("Vehicle 2").unwrap();
        let second = store.history_for("Vehicle 2").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_vehicle_id_is_compared_exactly() {
        let store = create_test_store();
        store
            .append(&entry("Vehicle 1", "2023-01-01", 0, 100, 10.0))
            .unwrap();
        assert!(store.latest_for("vehicle 1").unwrap().is_none());
        assert!(store.latest_for("Vehicle 1 ").unwrap().is_none());
    }

    #[test]
    fn test_count_and_count_for() {
        let store = create_test_store();
        assert_eq!(store.count().unwrap(), 0);

        store
            .append(&entry("Vehicle 1", "2023-01-01", 0, 100, 10.0))
            .unwrap();
        store
            .append(&entry("Vehicle 1", "2023-01-02", 100, 200, 10.0))
            .unwrap();
        store
            .append(&entry("Vehicle 2", "2023-01-01", 0, 100, 10.0))
            .unwrap();

        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(store.count_for("Vehicle 1").unwrap(), 2);
        assert_eq!(store.count_for("Vehicle 3").unwrap(), 0);
    }

    #[test]
    fn test_stats_empty() {
        let store = create_test_store();
        let stats = store.stats().unwrap();

        assert_eq!(stats.total_entries, 0);
        assert!(stats.vehicles.is_empty());
        assert!(stats.oldest_entry.is_none());
        assert!(stats.newest_entry.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_with_data() {
        let store = create_test_store();
        store
            .append(&entry("Vehicle 2", "2023-04-01", 0, 100, 10.0))
            .unwrap();
        store
            .append(&entry("Vehicle 1", "2023-01-01", 0, 100, 10.0))
            .unwrap();
        store
            .append(&entry("Vehicle 1", "2023-08-01", 100, 200, 10.0))
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.oldest_entry, Some(date("2023-01-01")));
        assert_eq!(stats.newest_entry, Some(date("2023-08-01")));
        assert_eq!(
            stats.vehicles,
            vec![
                VehicleCount {
                    vehicle_id: "Vehicle 1".to_string(),
                    entries: 2
                },
                VehicleCount {
                    vehicle_id: "Vehicle 2".to_string(),
                    entries: 1
                },
            ]
        );
    }

    #[test]
    fn test_path() {
        let store = create_test_store();
        assert_eq!(store.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_file_based_persists() {
        let db_path =
            std::env::temp_dir().join(format!("fleetlog_test_{}.db", std::process::id()));

        let store = LogStore::open(&db_path).unwrap();
        store
            .append(&entry("Vehicle 1", "2023-06-01", 1000, 1500, 25.0))
            .unwrap();
        assert_eq!(store.path(), db_path);
        assert!(store.stats().unwrap().db_size_bytes > 0);
        drop(store);

        let reopened = LogStore::open(&db_path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        drop(reopened);

        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let root = std::env::temp_dir().join(format!("fleetlog_test_dirs_{}", std::process::id()));
        let nested_path = root.join("nested/logbook.db");
        let _ = std::fs::remove_dir_all(&root);

        let store = LogStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(store);
        let _ = std::fs::remove_dir_all(&root);
    }
}
