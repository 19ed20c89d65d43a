//! End-to-end pipeline test: raw payload → merge → append → query.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::{DateTime, TimeZone, Utc};
use tempfile::tempdir;

use tenki_forecast::{merge, parse_editions, DailyRecord, MergeOptions};
use tenki_store::ForecastStore;

const ZONE: &str = "130010";
const OFFICE: &str = "130000";

fn payload() -> serde_json::Value {
    serde_json::json!([
        {
            "publishingOffice": "気象庁",
            "reportDatetime": "2026-08-06T17:00:00+09:00",
            "timeSeries": [
                {
                    "timeDefines": ["2026-08-06T17:00:00+09:00", "2026-08-07T00:00:00+09:00"],
                    "areas": [{
                        "area": { "name": "東京地方", "code": ZONE },
                        "weatherCodes": ["200", "101"],
                        "weathers": ["くもり", "晴れ時々曇り"]
                    }]
                },
                {
                    "timeDefines": ["2026-08-06T18:00:00+09:00", "2026-08-07T00:00:00+09:00"],
                    "areas": [{
                        "area": { "name": "東京地方", "code": ZONE },
                        "pops": ["20", "30"]
                    }]
                },
                {
                    "timeDefines": [
                        "2026-08-07T00:00:00+09:00",
                        "2026-08-07T09:00:00+09:00",
                        "2026-08-07T15:00:00+09:00"
                    ],
                    "areas": [{
                        "area": { "name": "東京", "code": ZONE },
                        "temps": ["24", "28", "31"]
                    }]
                }
            ]
        },
        {
            "publishingOffice": "気象庁",
            "reportDatetime": "2026-08-06T11:00:00+09:00",
            "timeSeries": [
                {
                    "timeDefines": ["2026-08-07T00:00:00+09:00", "2026-08-08T00:00:00+09:00"],
                    "areas": [{
                        "area": { "name": "東京地方", "code": OFFICE },
                        "weatherCodes": ["300", "201"],
                        "pops": ["80", "20"]
                    }]
                },
                {
                    "timeDefines": ["2026-08-07T00:00:00+09:00", "2026-08-08T00:00:00+09:00"],
                    "areas": [{
                        "area": { "name": "東京", "code": OFFICE },
                        "tempsMax": ["", "33"],
                        "tempsMin": ["", "25"]
                    }]
                }
            ]
        }
    ])
}

fn fetch_time(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 6, hour, 0, 0).single().unwrap()
}

fn merged_records() -> Vec<DailyRecord> {
    let editions = parse_editions(payload());
    merge(&editions, ZONE, OFFICE, &MergeOptions::default())
        .into_values()
        .collect()
}

#[test]
fn test_fetch_merge_store_roundtrip() {
    let dir = tempdir().unwrap();
    let mut store = ForecastStore::new(dir.path().join("tenki.db")).unwrap();

    let records = merged_records();
    store.append(ZONE, fetch_time(9), &records).unwrap();

    let latest = store.latest(ZONE).unwrap();
    assert_eq!(latest.len(), 3);

    // 6th: short-range condition only.
    assert_eq!(latest[0].weather.as_deref(), Some("くもり"));
    assert_eq!(latest[0].pop, Some(20));

    // 7th: short-range wins condition/pop, instants reduced to max/min.
    assert_eq!(latest[1].weather.as_deref(), Some("晴れ時々曇り"));
    assert_eq!(latest[1].pop, Some(30));
    assert_eq!(latest[1].temp_min, Some(24.0));
    assert_eq!(latest[1].temp_max, Some(31.0));

    // 8th: weekly-only, code translated, direct temps taken as-is.
    assert_eq!(latest[2].weather.as_deref(), Some("曇り時々晴れ"));
    assert_eq!(latest[2].weather_code.as_deref(), Some("201"));
    assert_eq!(latest[2].temp_max, Some(33.0));
    assert_eq!(latest[2].temp_min, Some(25.0));
}

#[test]
fn test_reappending_same_merge_keeps_one_version() {
    let dir = tempdir().unwrap();
    let mut store = ForecastStore::new(dir.path().join("tenki.db")).unwrap();

    let records = merged_records();
    store.append(ZONE, fetch_time(9), &records).unwrap();
    store.append(ZONE, fetch_time(9), &records).unwrap();

    assert_eq!(store.history(ZONE).unwrap(), vec![fetch_time(9)]);
}

#[test]
fn test_new_fetch_becomes_latest_old_stays_queryable() {
    let dir = tempdir().unwrap();
    let mut store = ForecastStore::new(dir.path().join("tenki.db")).unwrap();

    let records = merged_records();
    store.append(ZONE, fetch_time(9), &records).unwrap();

    let mut revised = merged_records();
    revised[0].pop = Some(50);
    store.append(ZONE, fetch_time(15), &revised).unwrap();

    assert_eq!(store.latest(ZONE).unwrap()[0].pop, Some(50));
    assert_eq!(store.at(ZONE, fetch_time(9)).unwrap()[0].pop, Some(20));
    assert_eq!(
        store.history(ZONE).unwrap(),
        vec![fetch_time(15), fetch_time(9)]
    );
}
