//! SQLite-based snapshot store for merged forecasts.
//!
//! Snapshots are append-only: one batch of daily records per
//! `(region, fetch time)`, never mutated, never deleted. The primary key on
//! `(region_code, forecast_date, fetched_at)` plus `INSERT OR IGNORE` makes
//! re-appending an identical batch a no-op and is the only guard against
//! overlapping writers.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use tenki_area::RegionEntry;
use tenki_forecast::DailyRecord;

/// SQLite store for forecast snapshots and the region catalogue cache.
pub struct ForecastStore {
    conn: Connection,
}

impl ForecastStore {
    /// Open (or create) a store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                region_code TEXT NOT NULL,
                forecast_date TEXT NOT NULL,
                fetched_at TEXT NOT NULL,
                weather TEXT,
                weather_code TEXT,
                pop INTEGER,
                temp_max REAL,
                temp_min REAL,
                PRIMARY KEY (region_code, forecast_date, fetched_at)
            );

            CREATE TABLE IF NOT EXISTS regions (
                zone_code TEXT PRIMARY KEY,
                zone_name TEXT NOT NULL,
                office_code TEXT NOT NULL,
                office_name TEXT NOT NULL,
                position INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_snapshots_region_fetched
                ON snapshots(region_code, fetched_at);
            "#,
        )?;
        Ok(())
    }

    /// Append one snapshot: all records tagged with the shared fetch time.
    ///
    /// Runs in a single transaction. Rows already present (identical
    /// region/date/fetch-time) are ignored, so re-appending the same batch
    /// cannot create duplicates. Returns the number of rows actually
    /// written.
    pub fn append(
        &mut self,
        region_code: &str,
        fetched_at: DateTime<Utc>,
        records: &[DailyRecord],
    ) -> Result<usize> {
        let fetched = fetched_at.to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        for record in records {
            inserted += tx.execute(
                r#"
                INSERT OR IGNORE INTO snapshots
                (region_code, forecast_date, fetched_at, weather, weather_code, pop, temp_max, temp_min)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    region_code,
                    record.date.to_string(),
                    fetched,
                    record.weather,
                    record.weather_code,
                    record.pop,
                    record.temp_max,
                    record.temp_min,
                ],
            )?;
        }
        tx.commit()?;
        tracing::info!(
            "appended snapshot for {} at {}: {} of {} rows",
            region_code,
            fetched,
            inserted,
            records.len()
        );
        Ok(inserted)
    }

    /// The batch with the maximum fetch time for a region, date ascending.
    pub fn latest(&self, region_code: &str) -> Result<Vec<DailyRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT forecast_date, weather, weather_code, pop, temp_max, temp_min
            FROM snapshots
            WHERE region_code = ?1
              AND fetched_at = (SELECT MAX(fetched_at) FROM snapshots WHERE region_code = ?1)
            ORDER BY forecast_date ASC
            "#,
        )?;

        let rows = stmt.query_map(params![region_code], Self::row_to_record)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Failed to read snapshot: {}", e))
    }

    /// The exact batch for one fetch time; empty if that version is absent.
    pub fn at(&self, region_code: &str, fetched_at: DateTime<Utc>) -> Result<Vec<DailyRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT forecast_date, weather, weather_code, pop, temp_max, temp_min
            FROM snapshots
            WHERE region_code = ?1 AND fetched_at = ?2
            ORDER BY forecast_date ASC
            "#,
        )?;

        let rows = stmt.query_map(
            params![region_code, fetched_at.to_rfc3339()],
            Self::row_to_record,
        )?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Failed to read snapshot: {}", e))
    }

    /// All distinct fetch times for a region, newest first.
    pub fn history(&self, region_code: &str) -> Result<Vec<DateTime<Utc>>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT DISTINCT fetched_at
            FROM snapshots
            WHERE region_code = ?1
            ORDER BY fetched_at DESC
            "#,
        )?;

        let rows = stmt.query_map(params![region_code], |row| {
            let raw: String = row.get(0)?;
            DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Failed to read history: {}", e))
    }

    /// Replace the cached region catalogue wholesale.
    pub fn cache_regions(&mut self, entries: &[RegionEntry]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM regions", [])?;
        for (position, entry) in entries.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO regions (zone_code, zone_name, office_code, office_name, position)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    entry.zone_code,
                    entry.zone_name,
                    entry.office_code,
                    entry.office_name,
                    position as i64,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// The cached region catalogue in its original order; empty if never
    /// cached.
    pub fn cached_regions(&self) -> Result<Vec<RegionEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT zone_code, zone_name, office_code, office_name
            FROM regions
            ORDER BY position ASC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RegionEntry {
                zone_code: row.get(0)?,
                zone_name: row.get(1)?,
                office_code: row.get(2)?,
                office_name: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Failed to read regions: {}", e))
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<DailyRecord> {
        let date_str: String = row.get(0)?;
        let date: NaiveDate = date_str.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;

        Ok(DailyRecord {
            date,
            weather: row.get(1)?,
            weather_code: row.get(2)?,
            pop: row.get(3)?,
            temp_max: row.get(4)?,
            temp_min: row.get(5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;

    const REGION: &str = "130010";

    fn fetch_time(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, hour, 0, 0).single().unwrap()
    }

    fn record(date: &str, weather: &str, max: f64, min: f64) -> DailyRecord {
        DailyRecord {
            date: date.parse().unwrap(),
            weather: Some(weather.to_string()),
            weather_code: None,
            pop: Some(30),
            temp_max: Some(max),
            temp_min: Some(min),
        }
    }

    #[test]
    fn test_append_and_latest_roundtrip() {
        let mut store = ForecastStore::in_memory().unwrap();
        let records = vec![
            record("2026-08-07", "晴れ", 32.0, 24.0),
            record("2026-08-06", "くもり", 30.0, 23.0),
        ];

        let inserted = store.append(REGION, fetch_time(9), &records).unwrap();
        assert_eq!(inserted, 2);

        let latest = store.latest(REGION).unwrap();
        assert_eq!(latest.len(), 2);
        // Date ascending regardless of append order.
        assert_eq!(latest[0].date.to_string(), "2026-08-06");
        assert_eq!(latest[1].date.to_string(), "2026-08-07");
        assert_eq!(latest[0].weather.as_deref(), Some("くもり"));
        assert_eq!(latest[1].temp_max, Some(32.0));
    }

    #[test]
    fn test_duplicate_append_is_idempotent() {
        let mut store = ForecastStore::in_memory().unwrap();
        let records = vec![record("2026-08-06", "晴れ", 31.0, 24.0)];

        assert_eq!(store.append(REGION, fetch_time(9), &records).unwrap(), 1);
        assert_eq!(store.append(REGION, fetch_time(9), &records).unwrap(), 0);

        let history = store.history(REGION).unwrap();
        assert_eq!(history, vec![fetch_time(9)]);
        assert_eq!(store.latest(REGION).unwrap().len(), 1);
    }

    #[test]
    fn test_latest_picks_newest_snapshot() {
        let mut store = ForecastStore::in_memory().unwrap();
        store
            .append(REGION, fetch_time(6), &[record("2026-08-06", "雨", 28.0, 22.0)])
            .unwrap();
        store
            .append(REGION, fetch_time(12), &[record("2026-08-06", "晴れ", 31.0, 24.0)])
            .unwrap();

        let latest = store.latest(REGION).unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].weather.as_deref(), Some("晴れ"));
    }

    #[test]
    fn test_at_returns_exact_version() {
        let mut store = ForecastStore::in_memory().unwrap();
        store
            .append(REGION, fetch_time(6), &[record("2026-08-06", "雨", 28.0, 22.0)])
            .unwrap();
        store
            .append(REGION, fetch_time(12), &[record("2026-08-06", "晴れ", 31.0, 24.0)])
            .unwrap();

        let older = store.at(REGION, fetch_time(6)).unwrap();
        assert_eq!(older[0].weather.as_deref(), Some("雨"));

        assert!(store.at(REGION, fetch_time(18)).unwrap().is_empty());
    }

    #[test]
    fn test_history_is_descending_and_per_region() {
        let mut store = ForecastStore::in_memory().unwrap();
        store
            .append(REGION, fetch_time(6), &[record("2026-08-06", "雨", 28.0, 22.0)])
            .unwrap();
        store
            .append(REGION, fetch_time(12), &[record("2026-08-06", "晴れ", 31.0, 24.0)])
            .unwrap();
        store
            .append("140010", fetch_time(9), &[record("2026-08-06", "くもり", 29.0, 23.0)])
            .unwrap();

        let history = store.history(REGION).unwrap();
        assert_eq!(history, vec![fetch_time(12), fetch_time(6)]);
    }

    #[test]
    fn test_unknown_region_is_empty_not_error() {
        let store = ForecastStore::in_memory().unwrap();
        assert!(store.latest("000000").unwrap().is_empty());
        assert!(store.history("000000").unwrap().is_empty());
    }

    #[test]
    fn test_nullable_fields_roundtrip() {
        let mut store = ForecastStore::in_memory().unwrap();
        let sparse = DailyRecord {
            date: "2026-08-10".parse().unwrap(),
            weather: Some("unknown(999)".to_string()),
            weather_code: Some("999".to_string()),
            pop: None,
            temp_max: Some(20.0),
            temp_min: None,
        };

        store.append(REGION, fetch_time(9), &[sparse.clone()]).unwrap();
        let latest = store.latest(REGION).unwrap();
        assert_eq!(latest, vec![sparse]);
    }

    #[test]
    fn test_cache_regions_replaces_wholesale_in_order() {
        let mut store = ForecastStore::in_memory().unwrap();
        let entry = |zone: &str, name: &str| RegionEntry {
            zone_code: zone.to_string(),
            zone_name: name.to_string(),
            office_code: "130000".to_string(),
            office_name: "東京都".to_string(),
        };

        store
            .cache_regions(&[entry("130010", "東京地方"), entry("130020", "伊豆諸島北部")])
            .unwrap();
        store
            .cache_regions(&[entry("140010", "東部"), entry("130010", "東京地方")])
            .unwrap();

        let cached = store.cached_regions().unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].zone_code, "140010");
        assert_eq!(cached[1].zone_code, "130010");
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenki.db");

        {
            let mut store = ForecastStore::new(&path).unwrap();
            store
                .append(REGION, fetch_time(9), &[record("2026-08-06", "晴れ", 31.0, 24.0)])
                .unwrap();
        }

        let store = ForecastStore::new(&path).unwrap();
        assert_eq!(store.latest(REGION).unwrap().len(), 1);
    }
}
