//! # Report Pipeline
//!
//! Fetch forecast → fetch buoy → extract both → assemble. The two sources are
//! isolated from each other: a transport or parse failure on one side only
//! degrades that side of the report.

use crate::config::Config;
use crate::fetch::Fetcher;
use crate::report::NormalizedReport;
use crate::{forecast, observation};
use std::time::Duration;
use tracing::{info, warn};

/// Fetch both sources and build the report for this run.
///
/// Never fails; the worst case is [`NormalizedReport::unavailable`]-equivalent
/// content.
pub async fn build_report(config: &Config) -> NormalizedReport {
    let fetcher = match Fetcher::new(Duration::from_secs(config.fetch.timeout_secs)) {
        Ok(fetcher) => Some(fetcher),
        Err(e) => {
            warn!(error = %e, "HTTP client unavailable, both sources skipped");
            None
        }
    };

    let bulletin = fetch_source(fetcher.as_ref(), "forecast", &config.forecast.url).await;
    let buoy_payload = fetch_source(fetcher.as_ref(), "buoy", &config.buoy.url).await;

    assemble(bulletin.as_deref(), buoy_payload.as_deref(), config)
}

/// Run both extractors over already-fetched payloads.
///
/// `None` stands for a source whose fetch failed.
pub fn assemble(
    bulletin: Option<&str>,
    buoy_payload: Option<&str>,
    config: &Config,
) -> NormalizedReport {
    let cap = config.forecast.period_cap();

    let periods = bulletin
        .map(|text| forecast::extract_with_cap(text, &config.forecast.zone, cap))
        .unwrap_or_default();
    let observation = buoy_payload
        .map(|payload| observation::extract(payload, config.buoy.format))
        .unwrap_or_default();

    info!(
        zone = %config.forecast.zone,
        periods = periods.len(),
        station = %config.buoy.station,
        observed = !observation.is_empty(),
        "Extraction complete"
    );

    NormalizedReport::new(&periods, observation, cap)
}

async fn fetch_source(fetcher: Option<&Fetcher>, source: &str, url: &str) -> Option<String> {
    let fetcher = fetcher?;
    match fetcher.fetch_text(url).await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!(source, url, error = %e, "Fetch failed, source will use fallback");
            None
        }
    }
}
