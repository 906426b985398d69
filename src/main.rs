//! # Wave Card Entry Point
//!
//! Runs the batch once: fetch the zone forecast and buoy feed, extract, and
//! write `wave_card.png`. Every source failure degrades the card instead of
//! aborting the run.
//!
//! Development modes:
//! - `--stdout`: print an ASCII rendition of the card instead of writing a PNG
//! - `--json`: print the normalized report as JSON


use anyhow::Context;
use chrono::Local;
use std::env;
use tracing::{info, warn};
use wave_card_lib::{
    config::Config,
    pipeline,
    renderer::{self, CardRenderer},
};

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let development_mode = env::args().any(|arg| arg == "--stdout");
    let json_mode = env::args().any(|arg| arg == "--json");

    let config = Config::load();

    // Sequential fetches; the runtime only drives the HTTP client
    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(pipeline::build_report(&config));
    if report.is_degraded() {
        warn!("One or more sources unavailable, rendering degraded card");
    }

    let today = Local::now().date_naive();

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if development_mode {
        renderer::draw_ascii(&report, &config, today);
        return Ok(());
    }

    CardRenderer::new(&config)
        .render_png(&report, today, &config.card.output)
        .with_context(|| format!("failed to write {}", config.card.output))?;
    info!(path = %config.card.output, "Wave card written");

    Ok(())
}
