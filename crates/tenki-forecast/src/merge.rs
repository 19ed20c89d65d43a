//! Temporal alignment and merge of multi-horizon forecast editions.
//!
//! The short-range and weekly editions publish different variables on
//! different timestamp grids, sometimes under different area codes. This
//! module folds every series onto calendar dates and reduces the candidates
//! into one [`DailyRecord`] per date. Editions are processed in document
//! order (short-range first), and a field populated by an earlier edition is
//! never overwritten by a later one; the coarser edition only fills gaps.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};

use crate::codes::translate;
use crate::types::{AreaSeries, DailyRecord, Edition, TimeSeries};

/// Hours whose single instant sample classifies as a minimum.
const MORNING_HOURS: RangeInclusive<u32> = 0..=6;
/// Hours whose instant samples compete for the maximum.
const DAYTIME_HOURS: RangeInclusive<u32> = 9..=15;

/// Merge behavior toggles.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Keep dates whose only populated field is the precipitation
    /// probability. Off by default: the probability grid extends past the
    /// condition horizon and would otherwise produce empty-looking rows.
    pub keep_pop_only_dates: bool,
}

/// Merge forecast editions into one record per calendar date.
///
/// Area selection tries `zone_code` first and falls back to `office_code`;
/// a series reporting under neither contributes nothing. Malformed
/// substructures (short arrays, unparseable stamps or numbers) skip the
/// affected value, never the whole merge.
pub fn merge(
    editions: &[Edition],
    zone_code: &str,
    office_code: &str,
    options: &MergeOptions,
) -> BTreeMap<NaiveDate, DailyRecord> {
    let lookup_keys = [zone_code, office_code];
    let mut days: BTreeMap<NaiveDate, DayBuilder> = BTreeMap::new();

    for edition in editions {
        for series in &edition.time_series {
            match select_area(series, &lookup_keys) {
                Some(area) => ingest_series(&mut days, series, area),
                None => {
                    tracing::debug!(
                        "no area matched {:?} in series with {} areas",
                        lookup_keys,
                        series.areas.len()
                    );
                }
            }
        }
    }

    days.into_iter()
        .filter_map(|(date, builder)| {
            builder.freeze(date, options).map(|record| (date, record))
        })
        .collect()
}

/// First area whose code matches a lookup key, keys tried in priority order.
fn select_area<'a>(series: &'a TimeSeries, keys: &[&str]) -> Option<&'a AreaSeries> {
    keys.iter()
        .find_map(|key| series.areas.iter().find(|a| a.area.code == *key))
}

fn ingest_series(days: &mut BTreeMap<NaiveDate, DayBuilder>, series: &TimeSeries, area: &AreaSeries) {
    for (index, stamp) in series.time_defines.iter().enumerate() {
        let at = match DateTime::parse_from_rfc3339(stamp) {
            Ok(at) => at,
            Err(e) => {
                tracing::warn!("skipping unparseable timestamp {:?}: {}", stamp, e);
                continue;
            }
        };
        // Fold to the calendar date as published, offset ignored.
        let day = days.entry(at.date_naive()).or_default();

        day.ingest_condition(area, index);
        day.ingest_pop(area, index);
        day.ingest_direct_temps(area, index);
        day.ingest_instant_temp(area, index, at);
    }
}

/// Per-date accumulator, frozen into a [`DailyRecord`] once every edition
/// has been folded in.
#[derive(Debug, Default)]
struct DayBuilder {
    weather: Option<String>,
    weather_code: Option<String>,
    pop: Option<u8>,
    direct_max: Option<f64>,
    direct_min: Option<f64>,
    instants: Vec<Instant>,
}

#[derive(Debug)]
struct Instant {
    at: DateTime<FixedOffset>,
    value: f64,
}

impl DayBuilder {
    /// Condition text, or the translated condition code when only the code
    /// is published. First non-empty value wins.
    fn ingest_condition(&mut self, area: &AreaSeries, index: usize) {
        if self.weather.is_some() {
            return;
        }
        let text = area.weathers.get(index).filter(|v| !v.is_empty());
        let code = area.weather_codes.get(index).filter(|v| !v.is_empty());
        if let Some(text) = text {
            self.weather = Some(text.clone());
            self.weather_code = code.cloned();
        } else if let Some(code) = code {
            self.weather = Some(translate(Some(code.as_str())));
            self.weather_code = Some(code.clone());
        }
    }

    fn ingest_pop(&mut self, area: &AreaSeries, index: usize) {
        if self.pop.is_some() {
            return;
        }
        if let Some(raw) = area.pops.get(index).filter(|v| !v.is_empty()) {
            match raw.trim().parse::<u8>() {
                Ok(value) => self.pop = Some(value),
                Err(e) => tracing::warn!("skipping unparseable pop {:?}: {}", raw, e),
            }
        }
    }

    /// Pre-labeled max/min from the weekly temperature series. Authoritative
    /// for their date; blank primaries fall back to the published range
    /// bounds. An inverted pair is swapped, a textually equal pair collapses
    /// to max only.
    fn ingest_direct_temps(&mut self, area: &AreaSeries, index: usize) {
        if self.direct_max.is_some() || self.direct_min.is_some() {
            return;
        }
        let max_raw = first_present(&[
            area.temps_max.get(index),
            area.temps_max_upper.get(index),
            area.temps_max_lower.get(index),
        ]);
        let min_raw = first_present(&[
            area.temps_min.get(index),
            area.temps_min_lower.get(index),
            area.temps_min_upper.get(index),
        ]);

        match (
            max_raw.and_then(parse_number),
            min_raw.and_then(parse_number),
        ) {
            (Some(max), Some(min)) => {
                if max_raw == min_raw {
                    self.direct_max = Some(max);
                } else if max < min {
                    self.direct_max = Some(min);
                    self.direct_min = Some(max);
                } else {
                    self.direct_max = Some(max);
                    self.direct_min = Some(min);
                }
            }
            (Some(max), None) => self.direct_max = Some(max),
            (None, Some(min)) => self.direct_min = Some(min),
            (None, None) => {}
        }
    }

    fn ingest_instant_temp(&mut self, area: &AreaSeries, index: usize, at: DateTime<FixedOffset>) {
        if let Some(raw) = area.temps.get(index).filter(|v| !v.is_empty()) {
            if let Some(value) = parse_number(raw) {
                self.instants.push(Instant { at, value });
            }
        }
    }

    fn freeze(self, date: NaiveDate, options: &MergeOptions) -> Option<DailyRecord> {
        let (temp_max, temp_min) = self.reduce_temps();
        let has_body = self.weather.is_some() || temp_max.is_some() || temp_min.is_some();
        if !has_body && !(options.keep_pop_only_dates && self.pop.is_some()) {
            return None;
        }
        Some(DailyRecord {
            date,
            weather: self.weather,
            weather_code: self.weather_code,
            pop: self.pop,
            temp_max,
            temp_min,
        })
    }

    fn reduce_temps(&self) -> (Option<f64>, Option<f64>) {
        if self.direct_max.is_some() || self.direct_min.is_some() {
            return (self.direct_max, self.direct_min);
        }
        reduce_instants(&self.instants)
    }
}

/// Reduce per-instant temperature samples to (max, min) for one date.
///
/// A lone sample classifies by hour: daytime or anything outside the morning
/// window counts as the maximum, the morning window as the minimum. With two
/// or more samples the minimum is the earliest morning sample (else the
/// numerically smallest) and the maximum the largest daytime sample (else
/// the largest overall); a degenerate equal pick re-derives chronologically,
/// and a single distinct value keeps the maximum only.
fn reduce_instants(instants: &[Instant]) -> (Option<f64>, Option<f64>) {
    match instants {
        [] => (None, None),
        [sample] => {
            if MORNING_HOURS.contains(&sample.at.hour()) {
                (None, Some(sample.value))
            } else {
                (Some(sample.value), None)
            }
        }
        _ => {
            let mut chronological: Vec<&Instant> = instants.iter().collect();
            chronological.sort_by_key(|s| s.at);

            let min = chronological
                .iter()
                .find(|s| MORNING_HOURS.contains(&s.at.hour()))
                .map(|s| s.value)
                .or_else(|| instants.iter().map(|s| s.value).reduce(f64::min));
            let max = instants
                .iter()
                .filter(|s| DAYTIME_HOURS.contains(&s.at.hour()))
                .map(|s| s.value)
                .reduce(f64::max)
                .or_else(|| instants.iter().map(|s| s.value).reduce(f64::max));

            match (max, min) {
                (Some(max), Some(min)) if max == min => {
                    // Degenerate pick: fall back to chronological order.
                    let first = chronological[0].value;
                    let last = chronological[chronological.len() - 1].value;
                    if first == last {
                        (Some(first), None)
                    } else if last < first {
                        (Some(first), Some(last))
                    } else {
                        (Some(last), Some(first))
                    }
                }
                (Some(max), Some(min)) if max < min => (Some(min), Some(max)),
                other => other,
            }
        }
    }
}

/// First value that is present and non-empty.
fn first_present<'a>(candidates: &[Option<&'a String>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .map(|v| v.as_str())
        .find(|v| !v.is_empty())
}

fn parse_number(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("skipping unparseable temperature {:?}: {}", raw, e);
            None
        }
    }
}
