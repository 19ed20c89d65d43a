//! Forecast-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Forecast endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ForecastError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Status(code) => format!("The forecast service replied with {}", code),
            Self::Parse(_) => "The forecast service sent an unreadable response.".to_string(),
        }
    }
}
