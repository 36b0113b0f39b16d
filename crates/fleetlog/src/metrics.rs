//! Derived logbook metrics.
//!
//! Pure functions with no state: everything here is computed from one or two
//! stored readings plus, for tax, the current date.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Distance since service at which a service becomes due soon.
pub const SERVICE_DUE_SOON_KM: i64 = 3000;

/// Distance since service at which a service is overdue.
pub const SERVICE_OVERDUE_KM: i64 = 6000;

/// Length of the road-tax validity window.
pub const TAX_VALIDITY_DAYS: i64 = 365;

/// How urgently a vehicle needs servicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceUrgency {
    /// Under [`SERVICE_DUE_SOON_KM`].
    Ok,
    /// Under [`SERVICE_OVERDUE_KM`].
    DueSoon,
    /// Everything else.
    OverDue,
}

impl std::fmt::Display for ServiceUrgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::DueSoon => write!(f, "due soon"),
            Self::OverDue => write!(f, "overdue"),
        }
    }
}

/// Whether road tax is still within its validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxStatus {
    /// Zero or more days left.
    Valid,
    /// Past the due date.
    Overdue,
}

impl std::fmt::Display for TaxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Overdue => write!(f, "overdue"),
        }
    }
}

/// Kilometers per liter over a trip.
///
/// Negative fuel or a regressing odometer are not checked and produce a
/// meaningless value.
///
/// # Errors
///
/// Returns [`Error::DivisionByZero`] when `fuel_used_liters` is zero, and
/// [`Error::InvalidReading`] when it is not a finite number or the odometer
/// span does not fit in an `i64`.
#[allow(clippy::cast_precision_loss)]
pub fn fuel_efficiency(start_odometer: i64, end_odometer: i64, fuel_used_liters: f64) -> Result<f64> {
    // NaN and infinities cannot be stored
    if !fuel_used_liters.is_finite() {
        return Err(Error::InvalidReading {
            field: "fuel_used",
            value: fuel_used_liters.to_string(),
        });
    }
    if fuel_used_liters == 0.0 {
        return Err(Error::DivisionByZero);
    }
    let distance = odometer_span(start_odometer, end_odometer)?;
    Ok(distance as f64 / fuel_used_liters)
}

/// Kilometers driven since the last service.
///
/// # Errors
///
/// Returns [`Error::InvalidServiceReading`] when the service reading is ahead
/// of the current odometer, or [`Error::InvalidReading`] when the distance
/// does not fit in an `i64`.
pub fn distance_since_service(current_odometer: i64, last_service_odometer: i64) -> Result<i64> {
    if last_service_odometer > current_odometer {
        return Err(Error::InvalidServiceReading {
            current_odometer,
            last_service_odometer,
        });
    }
    odometer_span(last_service_odometer, current_odometer)
}

/// `to - from`, or an error instead of overflowing.
fn odometer_span(from: i64, to: i64) -> Result<i64> {
    to.checked_sub(from).ok_or_else(|| Error::InvalidReading {
        field: "odometer",
        value: format!("{from} -> {to}"),
    })
}

/// Classify a distance since service.
#[must_use]
pub fn service_urgency(distance_since_service: i64) -> ServiceUrgency {
    if distance_since_service < SERVICE_DUE_SOON_KM {
        ServiceUrgency::Ok
    } else if distance_since_service < SERVICE_OVERDUE_KM {
        ServiceUrgency::DueSoon
    } else {
        ServiceUrgency::OverDue
    }
}

/// The date road tax falls due again.
#[must_use]
pub fn tax_due_date(last_tax_payment_date: NaiveDate) -> NaiveDate {
    last_tax_payment_date + Duration::days(TAX_VALIDITY_DAYS)
}

/// Whole days from `today` until road tax is due. Negative when overdue.
#[must_use]
pub fn days_until_tax_due(last_tax_payment_date: NaiveDate, today: NaiveDate) -> i64 {
    (tax_due_date(last_tax_payment_date) - today).num_days()
}

/// Classify a day count from [`days_until_tax_due`].
#[must_use]
pub fn tax_status(days_until_due: i64) -> TaxStatus {
    if days_until_due < 0 {
        TaxStatus::Overdue
    } else {
        TaxStatus::Valid
    }
}
