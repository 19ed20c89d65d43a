//! Area catalogue fetch client.
//!
//! The catalogue is fetched once per process at most; callers cache the
//! flattened entries through the snapshot store.

use std::time::Duration;

use tracing::instrument;

use crate::error::AreaError;
use crate::types::Catalogue;

const AREA_API_BASE: &str = "https://www.jma.go.jp/bosai";
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct AreaClient {
    client: reqwest::Client,
    base_url: String,
}

impl AreaClient {
    /// Create a client against the production endpoint.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, AreaError> {
        Self::with_base_url(AREA_API_BASE)
    }

    /// Create a client against an arbitrary base URL (used by tests).
    pub fn with_base_url(base_url: &str) -> Result<Self, AreaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the area catalogue.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self) -> Result<Catalogue, AreaError> {
        let url = format!("{}/common/const/area.json", self.base_url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AreaError::Status(response.status()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
