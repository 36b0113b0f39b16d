//! Gauges and charts for the dashboard.
//!
//! These are plain presentation models: a value with a fixed range, or a
//! list of dated points. They serialize to JSON for other front ends and
//! render to text for the terminal.

use std::fmt::Write as _;

use serde::Serialize;

use crate::entry::HistoryPoint;
use crate::metrics::{self, ServiceUrgency, TaxStatus};

/// Upper end of the fuel efficiency gauge, in KM/L.
pub const FUEL_EFFICIENCY_MAX: f64 = 30.0;

/// Upper end of the km-since-service gauge.
pub const KM_SINCE_SERVICE_MAX: f64 = 10_000.0;

/// Upper end of the last-service-odometer gauge.
pub const LAST_SERVICE_KM_MAX: f64 = 30_000.0;

/// Upper end of the tax countdown gauge, in days.
pub const TAX_DAYS_MAX: f64 = 365.0;

const BAR_WIDTH: usize = 20;

/// Colour band of a gauge bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// No judgement attached.
    Neutral,
    /// Healthy.
    Green,
    /// Needs attention soon.
    Yellow,
    /// Needs attention now.
    Red,
}

impl Band {
    fn marker(self) -> &'static str {
        match self {
            Self::Neutral => "",
            Self::Green => " [ok]",
            Self::Yellow => " [due soon]",
            Self::Red => " [overdue]",
        }
    }
}

impl From<ServiceUrgency> for Band {
    fn from(urgency: ServiceUrgency) -> Self {
        match urgency {
            ServiceUrgency::Ok => Self::Green,
            ServiceUrgency::DueSoon => Self::Yellow,
            ServiceUrgency::OverDue => Self::Red,
        }
    }
}

/// A single value shown against a fixed range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    /// Caption.
    pub title: String,
    /// Current reading.
    pub value: f64,
    /// Upper end of the range; the lower end is always zero.
    pub max: f64,
    /// Unit suffix, including the leading space.
    pub suffix: &'static str,
    /// Decimal places when printing the value.
    pub precision: usize,
    /// Colour band.
    pub band: Band,
}

impl Gauge {
    /// Fuel efficiency in KM/L.
    #[must_use]
    pub fn fuel_efficiency(km_per_liter: f64) -> Self {
        Self {
            title: "Fuel Efficiency (KM/L)".to_string(),
            value: km_per_liter,
            max: FUEL_EFFICIENCY_MAX,
            suffix: " KM/L",
            precision: 2,
            band: Band::Neutral,
        }
    }

    /// Distance since the last service, coloured by urgency.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn km_since_service(distance: i64) -> Self {
        Self {
            title: "KM Since Last Service".to_string(),
            value: distance as f64,
            max: KM_SINCE_SERVICE_MAX,
            suffix: " KM",
            precision: 0,
            band: metrics::service_urgency(distance).into(),
        }
    }

    /// Odometer reading at the last service.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn last_service_km(odometer: i64) -> Self {
        Self {
            title: "Last Service KM".to_string(),
            value: odometer as f64,
            max: LAST_SERVICE_KM_MAX,
            suffix: " KM",
            precision: 0,
            band: Band::Neutral,
        }
    }

    /// Days left until road tax is due. Overdue counts are negative and red.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn days_until_tax_due(days: i64) -> Self {
        let band = match metrics::tax_status(days) {
            TaxStatus::Valid => Band::Neutral,
            TaxStatus::Overdue => Band::Red,
        };
        Self {
            title: "Days Until Tax Due".to_string(),
            value: days as f64,
            max: TAX_DAYS_MAX,
            suffix: " Days",
            precision: 0,
            band,
        }
    }

    /// Number of filled bar cells, clamped to the range.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn filled_cells(&self) -> usize {
        if self.max <= 0.0 || !self.value.is_finite() {
            return 0;
        }
        let ratio = (self.value / self.max).clamp(0.0, 1.0);
        (ratio * BAR_WIDTH as f64).round() as usize
    }

    /// Render as one line of text.
    #[must_use]
    pub fn render(&self) -> String {
        let filled = self.filled_cells();
        format!(
            "{:<24} [{}{}] {:.prec$}{}{}",
            self.title,
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled),
            self.value,
            self.suffix,
            self.band.marker(),
            prec = self.precision,
        )
    }
}

/// One display slot on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    /// Nothing to show yet.
    Empty,
    /// A gauge.
    Gauge(Gauge),
    /// An explicit error shown in place of a gauge.
    Error {
        /// What went wrong.
        message: String,
    },
}

impl Widget {
    /// Build an error widget.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Check whether this widget is an error state.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The gauge inside, if any.
    #[must_use]
    pub fn as_gauge(&self) -> Option<&Gauge> {
        match self {
            Self::Gauge(gauge) => Some(gauge),
            _ => None,
        }
    }

    /// Render as one line of text.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Empty => "-".to_string(),
            Self::Gauge(gauge) => gauge.render(),
            Self::Error { message } => format!("Error: {message}"),
        }
    }
}

impl From<Gauge> for Widget {
    fn from(gauge: Gauge) -> Self {
        Self::Gauge(gauge)
    }
}

/// Fuel efficiency over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// Caption.
    pub title: String,
    /// Points, oldest first.
    pub points: Vec<HistoryPoint>,
}

impl Chart {
    /// Efficiency chart for one vehicle.
    #[must_use]
    pub fn fuel_efficiency(vehicle: &str, points: Vec<HistoryPoint>) -> Self {
        Self {
            title: format!("{vehicle} fuel efficiency (KM/L)"),
            points,
        }
    }

    /// Check whether the chart has any points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Render one row per point, bars scaled to the fuel efficiency range.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.title);
        if self.points.is_empty() {
            out.push_str("  (no entries)\n");
            return out;
        }
        for point in &self.points {
            let gauge = Gauge::fuel_efficiency(point.fuel_efficiency_km_per_liter);
            let filled = gauge.filled_cells();
            let _ = writeln!(
                out,
                "  {}  {:<width$} {:.2}",
                point.entry_date,
                "#".repeat(filled),
                point.fuel_efficiency_km_per_liter,
                width = BAR_WIDTH,
            );
        }
        out
    }
}
