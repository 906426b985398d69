//! # Configuration Management
//!
//! This module loads deploy-time settings from `wave-card.toml`. Every field has
//! a compiled-in default (zone AMZ726, buoy 41043), so the file is optional and
//! only needed to point the job at different endpoints or change the card size.

use crate::SourceFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default config file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "wave-card.toml";

/// Upper bound for the forecast period cap.
pub const MAX_PERIODS_LIMIT: usize = 7;

/// Application configuration loaded from wave-card.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Marine zone forecast source
    pub forecast: ForecastConfig,
    /// Buoy observation source
    pub buoy: BuoyConfig,
    /// Network settings shared by both sources
    pub fetch: FetchConfig,
    /// Output image settings
    pub card: CardConfig,
}

/// Marine forecast bulletin configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastConfig {
    /// Bulletin URL (HTML or plain text)
    pub url: String,
    /// Zone marker, e.g. "AMZ726"
    pub zone: String,
    /// Maximum number of forecast periods kept, clamped to 1..=7
    pub max_periods: usize,
}

/// NDBC buoy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuoyConfig {
    /// Station identifier, e.g. "41043"
    pub station: String,
    /// Observation feed URL
    pub url: String,
    /// Shape of the payload served at `url`
    pub format: SourceFormat,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Card canvas configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CardConfig {
    pub width: u32,
    pub height: u32,
    /// PNG output path
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            forecast: ForecastConfig {
                url: "https://www.ndbc.noaa.gov/data/Forecasts/FZCA52.TJSJ.html".to_string(),
                zone: "AMZ726".to_string(),
                max_periods: 6,
            },
            buoy: BuoyConfig {
                station: "41043".to_string(),
                url: "https://www.ndbc.noaa.gov/data/realtime2/41043.txt".to_string(),
                format: SourceFormat::ColumnarText,
            },
            fetch: FetchConfig { timeout_secs: 20 },
            card: CardConfig {
                width: 800,
                height: 950,
                output: "wave_card.png".to_string(),
            },
        }
    }
}

impl ForecastConfig {
    /// Period cap with the configured value clamped to the supported range.
    pub fn period_cap(&self) -> usize {
        self.max_periods.clamp(1, MAX_PERIODS_LIMIT)
    }
}

impl Config {
    /// Load configuration from wave-card.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        zone = %config.forecast.zone,
                        station = %config.buoy.station,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    warn!(error = %e, "Invalid config file format, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file found, using default configuration (AMZ726 / 41043)");
                Self::default()
            }
        }
    }
}
