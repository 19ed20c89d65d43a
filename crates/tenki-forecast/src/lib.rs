//! Forecast reconciliation for Tenki
//!
//! Parses the JMA multi-horizon forecast payload, translates numeric
//! weather codes, and merges the short-range and weekly editions into one
//! per-date record set.

pub mod client;
pub mod codes;
pub mod error;
pub mod merge;
pub mod types;

pub use client::ForecastClient;
pub use codes::translate;
pub use error::ForecastError;
pub use merge::{merge, MergeOptions};
pub use types::*;
