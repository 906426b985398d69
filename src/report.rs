//! # Normalized Report
//!
//! The read-only contract between extraction and rendering. A report is built
//! once per run from whatever the extractors produced and never changes after.
//! Renderers only see pre-formatted strings: forecast lines, observation values
//! with units, or the [`NOT_AVAILABLE`] sentinel.

use crate::observation::compass_point;
use crate::{BuoyObservation, ForecastPeriod, Measurement};
use serde::Serialize;

/// Sentinel shown for any observation field that could not be extracted.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown instead of forecast lines when no period was extracted.
pub const FALLBACK_FORECAST_TEXT: &str = "Wave forecast temporarily unavailable.";

/// Extraction output handed to the card renderer.
///
/// # Example
/// ```
/// use wave_card_lib::{report::NormalizedReport, BuoyObservation, ForecastPeriod};
///
/// let periods = vec![ForecastPeriod::new("TODAY", "Seas 3–5 ft")];
/// let report = NormalizedReport::new(&periods, BuoyObservation::default(), 6);
///
/// assert_eq!(report.forecast_text_lines(), vec!["TODAY: Seas 3–5 ft"]);
/// assert_eq!(report.significant_height_text(), "N/A");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedReport {
    forecast_lines: Vec<String>,
    observation: BuoyObservation,
    fallback_forecast_text: String,
}

impl NormalizedReport {
    /// Build a report, keeping at most `max_lines` forecast lines.
    pub fn new(periods: &[ForecastPeriod], observation: BuoyObservation, max_lines: usize) -> Self {
        Self {
            forecast_lines: periods
                .iter()
                .take(max_lines)
                .map(ForecastPeriod::to_line)
                .collect(),
            observation,
            fallback_forecast_text: FALLBACK_FORECAST_TEXT.to_string(),
        }
    }

    /// Report with no forecast and an all-missing observation.
    pub fn unavailable() -> Self {
        Self::new(&[], BuoyObservation::default(), 0)
    }

    pub fn forecast_lines(&self) -> &[String] {
        &self.forecast_lines
    }

    pub fn observation(&self) -> &BuoyObservation {
        &self.observation
    }

    pub fn fallback_forecast_text(&self) -> &str {
        &self.fallback_forecast_text
    }

    /// Lines to draw in the forecast area: the extracted lines, or the
    /// fallback text when there are none.
    pub fn forecast_text_lines(&self) -> Vec<&str> {
        if self.forecast_lines.is_empty() {
            vec![self.fallback_forecast_text.as_str()]
        } else {
            self.forecast_lines.iter().map(String::as_str).collect()
        }
    }

    pub fn significant_height_text(&self) -> String {
        height_text(self.observation.significant_height)
    }

    pub fn swell_height_text(&self) -> String {
        height_text(self.observation.swell_height)
    }

    pub fn swell_period_text(&self) -> String {
        self.observation
            .swell_period_s
            .map(|s| format!("{} sec", format_number(s)))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Degrees with the nearest compass point, e.g. "85° E".
    pub fn swell_direction_text(&self) -> String {
        self.observation
            .swell_direction_deg
            .map(|deg| format!("{:.0}° {}", deg, compass_point(deg)))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Observation time as "Oct 19 14:10 UTC", when the source carried one.
    pub fn observed_at_text(&self) -> Option<String> {
        self.observation
            .observed_at
            .map(|t| t.format("%b %d %H:%M UTC").to_string())
    }

    /// One-line buoy panel text.
    pub fn buoy_summary(&self) -> String {
        format!(
            "Sig: {} | Swell: {} | {} | {}",
            self.significant_height_text(),
            self.swell_height_text(),
            self.swell_period_text(),
            self.swell_direction_text()
        )
    }

    /// True when either source fell back entirely.
    pub fn is_degraded(&self) -> bool {
        self.forecast_lines.is_empty() || self.observation.is_empty()
    }
}

fn height_text(height: Option<Measurement>) -> String {
    height
        .map(|m| format!("{} {}", format_number(m.value), m.unit.suffix()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Whole numbers without a decimal, everything else with one.
fn format_number(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeightUnit;
    use chrono::{TimeZone, Utc};

    fn full_observation() -> BuoyObservation {
        BuoyObservation {
            significant_height: Some(Measurement::new(4.9, HeightUnit::Feet)),
            swell_height: Some(Measurement::new(4.0, HeightUnit::Feet)),
            swell_period_s: Some(9.0),
            swell_direction_deg: Some(85.0),
            observed_at: Some(Utc.with_ymd_and_hms(2026, 10, 19, 14, 10, 0).unwrap()),
        }
    }

    #[test]
    fn test_line_cap() {
        let periods: Vec<ForecastPeriod> = (0..10)
            .map(|i| ForecastPeriod::new(format!("P{i}"), "2–4 ft @ 8s"))
            .collect();
        for cap in [0, 1, 6, 7, 12] {
            let report = NormalizedReport::new(&periods, BuoyObservation::default(), cap);
            assert!(report.forecast_lines().len() <= cap);
        }
        let report = NormalizedReport::new(&periods, BuoyObservation::default(), 6);
        assert_eq!(report.forecast_lines().len(), 6);
        assert_eq!(report.forecast_lines()[0], "P0: 2–4 ft @ 8s");
    }

    #[test]
    fn test_fallback_text_when_no_periods() {
        let report = NormalizedReport::unavailable();
        assert_eq!(report.forecast_text_lines(), vec![FALLBACK_FORECAST_TEXT]);
        assert!(report.is_degraded());
    }

    #[test]
    fn test_sentinels_for_missing_fields() {
        let report = NormalizedReport::unavailable();
        assert_eq!(report.significant_height_text(), NOT_AVAILABLE);
        assert_eq!(report.swell_height_text(), NOT_AVAILABLE);
        assert_eq!(report.swell_period_text(), NOT_AVAILABLE);
        assert_eq!(report.swell_direction_text(), NOT_AVAILABLE);
        assert_eq!(report.observed_at_text(), None);
        assert_eq!(report.buoy_summary(), "Sig: N/A | Swell: N/A | N/A | N/A");
    }

    #[test]
    fn test_formatted_observation() {
        let periods = vec![ForecastPeriod::new("TODAY", "Seas 3–5 ft")];
        let report = NormalizedReport::new(&periods, full_observation(), 6);
        assert_eq!(report.significant_height_text(), "4.9 ft");
        assert_eq!(report.swell_height_text(), "4 ft");
        assert_eq!(report.swell_period_text(), "9 sec");
        assert_eq!(report.swell_direction_text(), "85° E");
        assert_eq!(report.observed_at_text().as_deref(), Some("Oct 19 14:10 UTC"));
        assert!(!report.is_degraded());
    }

    #[test]
    fn test_report_serializes() {
        let report = NormalizedReport::new(&[], full_observation(), 6);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["fallback_forecast_text"], FALLBACK_FORECAST_TEXT);
        assert_eq!(json["observation"]["significant_height"]["unit"], "feet");
    }
}
