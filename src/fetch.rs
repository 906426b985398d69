//! # Raw Source Fetching
//!
//! Downloads the forecast bulletin and buoy payload as text. This is the only
//! module that touches the network.
//!
//! ## Error Handling
//!
//! Each request is bounded by the configured timeout (20 s by default). There is
//! no retry and no backoff: this is a run-once batch job, so a failed fetch
//! just means that source's extractor gets nothing and the card shows its
//! fallback text or `N/A` placeholders.
//!
//! All failures surface through [`FetchError`]; the pipeline logs them and moves
//! on.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("wave-card/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while retrieving a source payload.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, timeout, TLS, or body decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status { status: StatusCode, url: String },
}

/// HTTP client shared by both sources.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` and return the body as text.
    ///
    /// # Example
    /// ```no_run
    /// use std::time::Duration;
    /// use wave_card_lib::fetch::Fetcher;
    ///
    /// # async fn run() {
    /// let fetcher = Fetcher::new(Duration::from_secs(20)).unwrap();
    /// let text = fetcher
    ///     .fetch_text("https://www.ndbc.noaa.gov/data/realtime2/41043.txt")
    ///     .await
    ///     .unwrap_or_default();
    /// # }
    /// ```
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!(url, bytes = body.len(), "Fetched source payload");
        Ok(body)
    }
}
