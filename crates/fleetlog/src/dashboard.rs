//! Per-vehicle dashboard panels and the all-vehicles overview.
//!
//! One [`VehiclePanel`] is built per vehicle from its latest entry and its
//! history; the overview is just the panel repeated over the configured
//! fleet.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::entry::VehicleLogEntry;
use crate::error::Result;
use crate::gauge::{Chart, Gauge, Widget};
use crate::metrics;
use crate::storage::LogStore;

/// Service widget for an end odometer and a service reading.
///
/// A regressed service reading becomes an error widget rather than a gauge.
#[must_use]
pub fn service_widget(end_odometer: i64, last_service_odometer: i64) -> Widget {
    match metrics::distance_since_service(end_odometer, last_service_odometer) {
        Ok(distance) => Gauge::km_since_service(distance).into(),
        Err(err) => Widget::error(err.to_string()),
    }
}

/// Tax countdown widget.
#[must_use]
pub fn tax_widget(last_tax_payment_date: NaiveDate, today: NaiveDate) -> Widget {
    Gauge::days_until_tax_due(metrics::days_until_tax_due(last_tax_payment_date, today)).into()
}

/// Dashboard view of a single vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehiclePanel {
    /// The vehicle shown.
    pub vehicle_id: String,
    /// Latest entry, if any.
    pub latest: Option<VehicleLogEntry>,
    /// Stored efficiency of the latest entry.
    pub fuel_efficiency: Widget,
    /// Distance since service, or an error for a regressed reading.
    pub service: Widget,
    /// Odometer at the last service.
    pub last_service_km: Widget,
    /// Days until road tax is due.
    pub tax: Widget,
    /// Road tax due date.
    pub tax_due_date: Option<NaiveDate>,
    /// Fuel efficiency history.
    pub history: Chart,
}

impl VehiclePanel {
    /// Build the panel from the store.
    ///
    /// A vehicle with no entries gets empty widgets and an empty chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn build(store: &LogStore, vehicle_id: &str, today: NaiveDate) -> Result<Self> {
        let latest = store.latest_for(vehicle_id)?;
        let history = Chart::fuel_efficiency(vehicle_id, store.history_for(vehicle_id)?);

        let panel = match latest {
            Some(entry) => Self {
                vehicle_id: vehicle_id.to_string(),
                fuel_efficiency: Gauge::fuel_efficiency(entry.fuel_efficiency_km_per_liter).into(),
                service: service_widget(entry.end_odometer, entry.last_service_odometer),
                last_service_km: Gauge::last_service_km(entry.last_service_odometer).into(),
                tax: tax_widget(entry.last_tax_payment_date, today),
                tax_due_date: Some(metrics::tax_due_date(entry.last_tax_payment_date)),
                latest: Some(entry),
                history,
            },
            None => Self {
                vehicle_id: vehicle_id.to_string(),
                latest: None,
                fuel_efficiency: Widget::Empty,
                service: Widget::Empty,
                last_service_km: Widget::Empty,
                tax: Widget::Empty,
                tax_due_date: None,
                history,
            },
        };

        debug!(
            "Built panel for {} ({} history points)",
            vehicle_id,
            panel.history.points.len()
        );
        Ok(panel)
    }

    /// Check whether the vehicle has any entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }

    /// Render the panel as text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("Vehicle Number: {}\n", self.vehicle_id);
        let Some(latest) = &self.latest else {
            out.push_str("  No entries recorded.\n");
            return out;
        };

        let _ = writeln!(
            out,
            "  Latest entry {} (#{}): {} -> {} KM ({} KM), {:.2} L",
            latest.entry_date,
            latest.id,
            latest.start_odometer,
            latest.end_odometer,
            latest.distance_km(),
            latest.fuel_used_liters,
        );
        for widget in [
            &self.fuel_efficiency,
            &self.service,
            &self.last_service_km,
            &self.tax,
        ] {
            let _ = writeln!(out, "  {}", widget.render());
        }
        if let Some(due) = self.tax_due_date {
            let _ = writeln!(out, "  Tax due on {due}");
        }
        for line in self.history.render().lines() {
            let _ = writeln!(out, "  {line}");
        }
        out
    }
}

/// All configured vehicles side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetOverview {
    /// Date the countdowns were computed against.
    pub as_of: NaiveDate,
    /// One panel per vehicle, in configured order.
    pub panels: Vec<VehiclePanel>,
}

impl FleetOverview {
    /// Build a panel for each vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn build<S: AsRef<str>>(
        store: &LogStore,
        vehicles: &[S],
        today: NaiveDate,
    ) -> Result<Self> {
        let panels = vehicles
            .iter()
            .map(|v| VehiclePanel::build(store, v.as_ref(), today))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            as_of: today,
            panels,
        })
    }

    /// Render every panel as text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("All Vehicles (as of {})\n", self.as_of);
        for panel in &self.panels {
            out.push('\n');
            out.push_str(&panel.render());
        }
        out
    }
}
