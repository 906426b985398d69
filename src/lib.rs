//! # Wave Card Core Library
//!
//! This library turns two unstable NOAA text sources into a small, fully-formed
//! report that a renderer can lay out on a fixed canvas:
//!
//! - a **marine zone forecast bulletin** (plain text or HTML), segmented into
//!   labelled periods with a one-line wave summary each
//! - a **buoy observation feed** (NDBC whitespace-delimited columns or a station
//!   page HTML table), reduced to the latest valid reading
//!
//! ## Design Philosophy
//!
//! ### Always Render Something
//! Upstream formats drift. Every extraction step returns an explicit `Result`
//! internally, and the public `extract` functions fold failures into empty or
//! sentinel values. A run with no network still produces a card showing
//! "temporarily unavailable" and `N/A` placeholders.
//!
//! ### Columns By Name
//! Buoy columns are resolved through a parsed header, never by position. When
//! the header cannot be found the reading degrades to sentinels instead of
//! guessing.
//!
//! ### Explicit Units
//! Source tables mix meters and feet across format revisions. A [`Measurement`]
//! always carries its [`HeightUnit`], and conversion happens only when the
//! column definition says the value is in meters.
//!
//! ## Data Flow
//! 1. **Fetch**: bulletin and buoy payloads ([`fetch`])
//! 2. **Extract**: [`forecast::extract`] and [`observation::extract`], independently
//! 3. **Assemble**: [`report::NormalizedReport`], immutable from here on
//! 4. **Render**: [`renderer`] draws onto a [`canvas::Canvas`] and writes a PNG

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Module declarations
pub mod canvas;
pub mod config;
pub mod fetch;
pub mod forecast;
pub mod observation;
pub mod pipeline;
pub mod renderer;
pub mod report;

/// Fixed meters → feet conversion factor.
pub const FEET_PER_METER: f32 = 3.28084;

/// One labelled forecast period with its extracted wave summary.
///
/// Periods keep the order in which they appear in the bulletin. Labels are
/// not guaranteed unique, and a period with no wave content is never
/// represented at all.
///
/// # Example
/// ```
/// use wave_card_lib::ForecastPeriod;
///
/// let period = ForecastPeriod::new("TODAY", "Seas 3–5 ft");
/// assert_eq!(period.to_line(), "TODAY: Seas 3–5 ft");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    /// Canonical period label, e.g. "TODAY", "TONIGHT", "SAT NIGHT"
    pub label: String,
    /// Short wave summary, e.g. "4–6 ft @ 8s"
    pub wave_summary: String,
}

impl ForecastPeriod {
    pub fn new(label: impl Into<String>, wave_summary: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            wave_summary: wave_summary.into(),
        }
    }

    /// Pre-rendered "label: summary" line.
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.label, self.wave_summary)
    }
}

/// Unit a height column is defined in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    Feet,
    Meters,
}

impl HeightUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            HeightUnit::Feet => "ft",
            HeightUnit::Meters => "m",
        }
    }
}

/// A height value together with the unit it was reported in.
///
/// # Example
/// ```
/// use wave_card_lib::{HeightUnit, Measurement};
///
/// let metric = Measurement::new(1.5, HeightUnit::Meters);
/// let feet = metric.in_feet();
/// assert_eq!(feet.unit, HeightUnit::Feet);
/// assert!((feet.value - 4.9).abs() < 1e-4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f32,
    pub unit: HeightUnit,
}

impl Measurement {
    pub fn new(value: f32, unit: HeightUnit) -> Self {
        Self { value, unit }
    }

    /// Convert to feet, rounded to one decimal place.
    ///
    /// Values already in feet are returned unchanged.
    pub fn in_feet(self) -> Self {
        match self.unit {
            HeightUnit::Feet => self,
            HeightUnit::Meters => Self {
                value: round_tenth(self.value * FEET_PER_METER),
                unit: HeightUnit::Feet,
            },
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} {}", self.value, self.unit.suffix())
    }
}

/// Latest valid buoy reading.
///
/// Every field is independently either a validated value or `None`, which the
/// report layer renders as the "N/A" sentinel. A partially parsed value never
/// reaches this struct: heights are finite and non-negative, directions are
/// within 0–360 degrees.
///
/// `Default` is the all-missing reading returned when extraction fails
/// structurally.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BuoyObservation {
    /// Significant wave height, in feet after extraction
    pub significant_height: Option<Measurement>,
    /// Swell height, in feet after extraction
    pub swell_height: Option<Measurement>,
    /// Swell (or dominant) wave period in seconds
    pub swell_period_s: Option<f32>,
    /// Direction the swell comes from, degrees true
    pub swell_direction_deg: Option<f32>,
    /// Time of the selected row, when the source carries one
    pub observed_at: Option<DateTime<Utc>>,
}

impl BuoyObservation {
    /// True when no wave field was extracted.
    pub fn is_empty(&self) -> bool {
        self.significant_height.is_none()
            && self.swell_height.is_none()
            && self.swell_period_s.is_none()
            && self.swell_direction_deg.is_none()
    }
}

/// Shape of a buoy observation payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Whitespace-delimited realtime feed with a `#` header row
    ColumnarText,
    /// Station page containing one or more HTML tables
    HtmlTable,
}

/// Round to one decimal place.
pub(crate) fn round_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
