use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration, read from `<config_dir>/tenki/config.toml`.
///
/// Every field has a default so a missing or partial file still yields a
/// working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database location.
    pub db_path: PathBuf,

    /// Override for the forecast endpoint base URL (defaults to JMA).
    pub forecast_base_url: Option<String>,

    /// Override for the area catalogue base URL (defaults to JMA).
    pub area_base_url: Option<String>,

    /// Keep dates that only carry a precipitation probability.
    pub keep_pop_only_dates: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tenki");

        Self {
            db_path: data_dir.join("forecasts.db"),
            forecast_base_url: None,
            area_base_url: None,
            keep_pop_only_dates: false,
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tenki")
            .join("config.toml")
    }

    /// Load the configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path (used by tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load_from(std::path::Path::new("/nonexistent/config.toml")).unwrap();
        assert!(!config.keep_pop_only_dates);
        assert!(config.forecast_base_url.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("keep_pop_only_dates = true").unwrap();
        assert!(config.keep_pop_only_dates);
        assert!(config.area_base_url.is_none());
        assert!(config.db_path.ends_with("forecasts.db"));
    }
}
