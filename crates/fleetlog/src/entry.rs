//! Core logbook types for fleetlog.
//!
//! A logbook entry captures one vehicle's odometer, fuel, service and road
//! tax snapshot for a single date. Entries are written once and never
//! changed afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date format used for every stored and user-facing date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the value is not a valid calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}

/// A stored logbook row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleLogEntry {
    /// Identifier assigned by the store. Never reused.
    pub id: i64,
    /// Which vehicle this entry belongs to.
    pub vehicle_id: String,
    /// Odometer reading at the start of the period.
    pub start_odometer: i64,
    /// Odometer reading at the end of the period.
    pub end_odometer: i64,
    /// Fuel consumed over the period, in liters.
    pub fuel_used_liters: f64,
    /// Distance over fuel, computed once at insert time.
    pub fuel_efficiency_km_per_liter: f64,
    /// Odometer reading at the most recent service.
    pub last_service_odometer: i64,
    /// The date this entry pertains to.
    pub entry_date: NaiveDate,
    /// Most recent road-tax payment known at entry time.
    pub last_tax_payment_date: NaiveDate,
}

impl VehicleLogEntry {
    /// Distance covered during this entry's period.
    #[must_use]
    pub fn distance_km(&self) -> i64 {
        self.end_odometer.saturating_sub(self.start_odometer)
    }
}

/// An entry that has not been written yet.
///
/// Carries no id and no derived efficiency; the store fills both in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    /// Which vehicle this entry belongs to.
    pub vehicle_id: String,
    /// Odometer reading at the start of the period.
    pub start_odometer: i64,
    /// Odometer reading at the end of the period.
    pub end_odometer: i64,
    /// Fuel consumed over the period, in liters.
    pub fuel_used_liters: f64,
    /// Odometer reading at the most recent service.
    pub last_service_odometer: i64,
    /// The date this entry pertains to.
    pub entry_date: NaiveDate,
    /// Most recent road-tax payment.
    pub last_tax_payment_date: NaiveDate,
}

/// A submitted logbook form where any field may have been left blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryForm {
    /// Selected vehicle.
    pub vehicle_id: Option<String>,
    /// Entry date.
    pub entry_date: Option<NaiveDate>,
    /// Start KM.
    pub start_odometer: Option<i64>,
    /// End KM.
    pub end_odometer: Option<i64>,
    /// Fuel used in liters.
    pub fuel_used_liters: Option<f64>,
    /// Last service KM.
    pub last_service_odometer: Option<i64>,
    /// Last tax payment date.
    pub last_tax_payment_date: Option<NaiveDate>,
}

impl EntryForm {
    /// Turn the form into a [`NewEntry`].
    ///
    /// Fields are checked in form order and the first blank one is reported.
    /// A blank vehicle name counts as missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingInput`] naming the first absent field.
    pub fn into_new_entry(self) -> Result<NewEntry> {
        let vehicle_id = self
            .vehicle_id
            .filter(|v| !v.trim().is_empty())
            .ok_or(Error::missing("vehicle"))?;
        let entry_date = self.entry_date.ok_or(Error::missing("date"))?;
        let start_odometer = self.start_odometer.ok_or(Error::missing("start_km"))?;
        let end_odometer = self.end_odometer.ok_or(Error::missing("end_km"))?;
        let fuel_used_liters = self.fuel_used_liters.ok_or(Error::missing("fuel_used"))?;
        let last_service_odometer = self
            .last_service_odometer
            .ok_or(Error::missing("last_service_km"))?;
        let last_tax_payment_date = self
            .last_tax_payment_date
            .ok_or(Error::missing("last_tax_payment"))?;

        Ok(NewEntry {
            vehicle_id,
            start_odometer,
            end_odometer,
            fuel_used_liters,
            last_service_odometer,
            entry_date,
            last_tax_payment_date,
        })
    }
}

/// One point of a vehicle's fuel efficiency history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Stored efficiency for the entry.
    pub fuel_efficiency_km_per_liter: f64,
    /// Date of the entry.
    pub entry_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn full_form() -> EntryForm {
        EntryForm {
            vehicle_id: Some("Vehicle 1".to_string()),
            entry_date: Some(date("2023-06-01")),
            start_odometer: Some(1000),
            end_odometer: Some(1500),
            fuel_used_liters: Some(25.0),
            last_service_odometer: Some(900),
            last_tax_payment_date: Some(date("2023-01-01")),
        }
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date("2023-06-01").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
        assert_eq!(parse_date(" 2023-06-01 ").unwrap(), d);
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        let err = parse_date("01-06-2023").unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
        assert!(parse_date("2023-02-30").is_err());
    }

    #[test]
    fn test_complete_form_converts() {
        let entry = full_form().into_new_entry().unwrap();
        assert_eq!(entry.vehicle_id, "Vehicle 1");
        assert_eq!(entry.start_odometer, 1000);
        assert_eq!(entry.end_odometer, 1500);
        assert!((entry.fuel_used_liters - 25.0).abs() < f64::EPSILON);
        assert_eq!(entry.last_tax_payment_date, date("2023-01-01"));
    }

    #[test]
    fn test_missing_field_is_named() {
        let mut form = full_form();
        form.fuel_used_liters = None;
        let err = form.into_new_entry().unwrap_err();
        assert!(matches!(err, Error::MissingInput { field: "fuel_used" }));
    }

    #[test]
    fn test_first_missing_field_wins() {
        let form = EntryForm {
            vehicle_id: Some("Vehicle 2".to_string()),
            ..EntryForm::default()
        };
        let err = form.into_new_entry().unwrap_err();
        assert!(matches!(err, Error::MissingInput { field: "date" }));
    }

    #[test]
    fn test_blank_vehicle_is_missing() {
        let mut form = full_form();
        form.vehicle_id = Some("   ".to_string());
        let err = form.into_new_entry().unwrap_err();
        assert!(matches!(err, Error::MissingInput { field: "vehicle" }));
    }

    #[test]
    fn test_distance_km() {
        let entry = VehicleLogEntry {
            id: 1,
            vehicle_id: "Vehicle 1".to_string(),
            start_odometer: 1000,
            end_odometer: 1500,
            fuel_used_liters: 25.0,
            fuel_efficiency_km_per_liter: 20.0,
            last_service_odometer: 900,
            entry_date: date("2023-06-01"),
            last_tax_payment_date: date("2023-01-01"),
        };
        assert_eq!(entry.distance_km(), 500);
    }

    #[test]
    fn test_entry_serializes_dates_as_iso() {
        let point = HistoryPoint {
            fuel_efficiency_km_per_liter: 12.5,
            entry_date: date("2023-06-01"),
        };
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"2023-06-01\""));
    }
}
