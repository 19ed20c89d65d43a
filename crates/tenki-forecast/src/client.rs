//! Forecast fetch client for the JMA bosai endpoint.
//!
//! Fetch-once semantics: no retry or backoff, the raw error surfaces to the
//! caller (the presentation layer owns how it is shown).

use std::time::Duration;

use tracing::instrument;

use crate::error::ForecastError;
use crate::types::{parse_editions, Edition};

const FORECAST_API_BASE: &str = "https://www.jma.go.jp/bosai";
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct ForecastClient {
    client: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    /// Create a client against the production endpoint.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, ForecastError> {
        Self::with_base_url(FORECAST_API_BASE)
    }

    /// Create a client against an arbitrary base URL (used by tests).
    pub fn with_base_url(base_url: &str) -> Result<Self, ForecastError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the forecast document published for one office.
    ///
    /// Malformed editions inside an otherwise valid document are skipped;
    /// a response that is not JSON at all is an error.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, office_code: &str) -> Result<Vec<Edition>, ForecastError> {
        let url = format!(
            "{}/forecast/data/forecast/{}.json",
            self.base_url, office_code
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ForecastError::Status(response.status()));
        }

        let body = response.text().await?;
        let document: serde_json::Value = serde_json::from_str(&body)?;
        Ok(parse_editions(document))
    }
}
