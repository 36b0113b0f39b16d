//! Request handlers, one per user action.
//!
//! Each handler borrows the store and configuration for the duration of a
//! single request, runs to completion and returns something renderable.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dashboard::{self, FleetOverview, VehiclePanel};
use crate::entry::EntryForm;
use crate::error::{Error, Result};
use crate::gauge::{Chart, Gauge, Widget};
use crate::storage::LogStore;

/// Result of submitting the entry form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// A field was blank, so nothing was written.
    Skipped {
        /// The first blank field.
        missing: &'static str,
    },
    /// The entry was stored.
    Recorded(Submission),
}

impl SubmitOutcome {
    /// The stored entry id, if one was written.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Skipped { .. } => None,
            Self::Recorded(submission) => Some(submission.id),
        }
    }

    /// Render as text.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Skipped { missing } => {
                format!("Vehicle Number\nNothing recorded: {missing} was not provided.\n")
            }
            Self::Recorded(submission) => submission.render(),
        }
    }
}

/// Gauges produced by a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    /// Id of the stored entry.
    pub id: i64,
    /// The vehicle the entry was recorded for.
    pub vehicle_id: String,
    /// Efficiency of this entry.
    pub fuel_efficiency: Widget,
    /// Distance since service, or an error for a regressed reading.
    pub service: Widget,
    /// Days until road tax is due.
    pub tax: Widget,
}

impl Submission {
    /// Render as text.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "Vehicle Number: {}\nRecorded entry #{}\n  {}\n  {}\n  {}\n",
            self.vehicle_id,
            self.id,
            self.fuel_efficiency.render(),
            self.service.render(),
            self.tax.render(),
        )
    }
}

/// Values used to prefill the form when a vehicle is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefill {
    /// The selected vehicle.
    pub vehicle_id: String,
    /// Last service KM from the latest entry.
    pub last_service_odometer: Option<i64>,
    /// Last tax payment from the latest entry.
    pub last_tax_payment_date: Option<NaiveDate>,
}

impl Prefill {
    /// Render as text.
    #[must_use]
    pub fn render(&self) -> String {
        let service = self
            .last_service_odometer
            .map_or_else(|| "-".to_string(), |km| format!("{km} KM"));
        let tax = self
            .last_tax_payment_date
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        format!(
            "Vehicle Number: {}\n  Last service KM:   {service}\n  Last tax payment:  {tax}\n",
            self.vehicle_id
        )
    }
}

/// Handles user actions against one store.
#[derive(Debug, Clone, Copy)]
pub struct RequestHandler<'a> {
    store: &'a LogStore,
    config: &'a Config,
}

impl<'a> RequestHandler<'a> {
    /// Create a handler over a store and configuration.
    #[must_use]
    pub fn new(store: &'a LogStore, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Submit the entry form.
    ///
    /// Blank fields skip the write and yield [`SubmitOutcome::Skipped`]. A
    /// service reading ahead of the end odometer is stored and shown as an
    /// error widget, unless `validation.reject_service_regression` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVehicle`] for a vehicle outside the fleet,
    /// [`Error::DivisionByZero`] for zero fuel, [`Error::InvalidServiceReading`]
    /// when strict validation rejects the entry, or a storage error.
    pub fn submit_entry(&self, form: EntryForm, today: NaiveDate) -> Result<SubmitOutcome> {
        let entry = match form.into_new_entry() {
            Ok(entry) => entry,
            Err(Error::MissingInput { field }) => {
                debug!("Submit skipped, missing {}", field);
                return Ok(SubmitOutcome::Skipped { missing: field });
            }
            Err(err) => return Err(err),
        };

        self.config.require_vehicle(&entry.vehicle_id)?;

        let service = dashboard::service_widget(entry.end_odometer, entry.last_service_odometer);
        if service.is_error() {
            if self.config.validation.reject_service_regression {
                return Err(Error::InvalidServiceReading {
                    current_odometer: entry.end_odometer,
                    last_service_odometer: entry.last_service_odometer,
                });
            }
            warn!(
                "Recording {} with service reading {} ahead of end odometer {}",
                entry.vehicle_id, entry.last_service_odometer, entry.end_odometer
            );
        }

        let id = self.store.append(&entry)?;
        info!("Recorded entry {} for {}", id, entry.vehicle_id);

        let fuel_efficiency = self.store.get(id)?.map_or(Widget::Empty, |stored| {
            Gauge::fuel_efficiency(stored.fuel_efficiency_km_per_liter).into()
        });

        Ok(SubmitOutcome::Recorded(Submission {
            id,
            vehicle_id: entry.vehicle_id,
            fuel_efficiency,
            service,
            tax: dashboard::tax_widget(entry.last_tax_payment_date, today),
        }))
    }

    /// Prefill values for a newly selected vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVehicle`] or a storage error.
    pub fn select_vehicle(&self, vehicle_id: &str) -> Result<Prefill> {
        self.config.require_vehicle(vehicle_id)?;
        let latest = self.store.latest_for(vehicle_id)?;
        Ok(Prefill {
            vehicle_id: vehicle_id.to_string(),
            last_service_odometer: latest.as_ref().map(|e| e.last_service_odometer),
            last_tax_payment_date: latest.as_ref().map(|e| e.last_tax_payment_date),
        })
    }

    /// Dashboard panel for one vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVehicle`] or a storage error.
    pub fn view_vehicle(&self, vehicle_id: &str, today: NaiveDate) -> Result<VehiclePanel> {
        self.config.require_vehicle(vehicle_id)?;
        VehiclePanel::build(self.store, vehicle_id, today)
    }

    /// Panels for every configured vehicle.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn view_fleet(&self, today: NaiveDate) -> Result<FleetOverview> {
        FleetOverview::build(self.store, self.config.vehicles(), today)
    }

    /// Fuel efficiency chart for one vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVehicle`] or a storage error.
    pub fn view_history(&self, vehicle_id: &str) -> Result<Chart> {
        self.config.require_vehicle(vehicle_id)?;
        Ok(Chart::fuel_efficiency(
            vehicle_id,
            self.store.history_for(vehicle_id)?,
        ))
    }
}
