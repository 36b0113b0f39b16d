//! `SQLite` schema definitions for the logbook.

/// SQL statement to create the logbook table.
///
/// Dates are stored as `YYYY-MM-DD` text so that lexical order matches
/// calendar order.
pub const CREATE_VEHICLE_LOG_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS vehicle_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vehicle_id TEXT NOT NULL,
    start_odometer INTEGER NOT NULL,
    end_odometer INTEGER NOT NULL,
    fuel_used_liters REAL NOT NULL,
    fuel_efficiency_km_per_liter REAL NOT NULL,
    last_service_odometer INTEGER NOT NULL,
    entry_date TEXT NOT NULL,
    last_tax_payment_date TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// Index backing the per-vehicle, date-ordered lookups.
pub const CREATE_VEHICLE_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_vehicle_log_vehicle_date
ON vehicle_log(vehicle_id, entry_date, id)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_VEHICLE_LOG_TABLE,
    CREATE_VEHICLE_DATE_INDEX,
    CREATE_METADATA_TABLE,
];
