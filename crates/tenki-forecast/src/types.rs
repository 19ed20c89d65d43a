use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One forecast horizon bundle within a fetch response.
///
/// The JMA document is an ordered list of editions: index 0 is the
/// short-range (three-day) report, index 1 the weekly report. Every field is
/// defaulted so a sparse edition deserializes instead of failing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
    #[serde(default)]
    pub publishing_office: Option<String>,
    #[serde(default)]
    pub report_datetime: Option<String>,
    #[serde(default)]
    pub time_series: Vec<TimeSeries>,
}

/// One variable's time-aligned value sequence for one or more areas.
///
/// `time_defines` is kept as raw ISO-8601 strings; the merge parses each
/// stamp individually so a single bad entry skips one column rather than
/// rejecting the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    #[serde(default)]
    pub time_defines: Vec<String>,
    #[serde(default)]
    pub areas: Vec<AreaSeries>,
}

/// Value arrays for one administrative area within a series.
///
/// Which arrays are populated depends on the series: short-range series carry
/// `weathers`/`pops`/`temps`, the weekly temperature series carries
/// `tempsMax`/`tempsMin` plus their upper/lower range variants. Values are
/// strings in the source document, with `""` standing for "not published".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSeries {
    #[serde(default)]
    pub area: AreaRef,
    #[serde(default)]
    pub weathers: Vec<String>,
    #[serde(default)]
    pub weather_codes: Vec<String>,
    #[serde(default)]
    pub pops: Vec<String>,
    #[serde(default)]
    pub temps: Vec<String>,
    #[serde(default)]
    pub temps_max: Vec<String>,
    #[serde(default)]
    pub temps_max_upper: Vec<String>,
    #[serde(default)]
    pub temps_max_lower: Vec<String>,
    #[serde(default)]
    pub temps_min: Vec<String>,
    #[serde(default)]
    pub temps_min_upper: Vec<String>,
    #[serde(default)]
    pub temps_min_lower: Vec<String>,
}

/// Area identity as published in the payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AreaRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// One consolidated forecast day, keyed by calendar date.
///
/// Every field except the date is nullable; the merge emits a record only
/// when it carries at least one of condition, max, or min. When both bounds
/// are present, `temp_max >= temp_min` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub weather: Option<String>,
    pub weather_code: Option<String>,
    pub pop: Option<u8>,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
}

/// Deserialize a forecast document into its editions, skipping any edition
/// that does not match the expected shape. Partial results are preferred
/// over none.
pub fn parse_editions(document: serde_json::Value) -> Vec<Edition> {
    let raw = match document {
        serde_json::Value::Array(items) => items,
        other => {
            tracing::warn!("forecast document is not an array: {}", other);
            return Vec::new();
        }
    };

    raw.into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(edition) => Some(edition),
            Err(e) => {
                tracing::warn!("skipping malformed edition {}: {}", index, e);
                None
            }
        })
        .collect()
}
