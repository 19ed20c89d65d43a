//! Console front end: fetch, merge, store, display.
//!
//! Everything here is presentation; the reconciliation and persistence
//! rules live in the library crates.

mod config;

use anyhow::{bail, Context, Result};
use chrono::Utc;

use config::Config;
use tenki_area::{AreaClient, AreaDirectory};
use tenki_forecast::{merge, DailyRecord, ForecastClient, MergeOptions};
use tenki_store::ForecastStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut store = ForecastStore::new(&config.db_path)?;

    let directory = load_directory(&config, &mut store).await?;

    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(zone_code) => run_fetch(&config, &mut store, &directory, &zone_code).await,
        None => {
            print_regions(&directory);
            Ok(())
        }
    }
}

/// Region directory from the store cache, fetching the catalogue on first
/// run.
async fn load_directory(config: &Config, store: &mut ForecastStore) -> Result<AreaDirectory> {
    let cached = store.cached_regions()?;
    if !cached.is_empty() {
        tracing::debug!("using {} cached regions", cached.len());
        return Ok(AreaDirectory::from_entries(cached));
    }

    let client = match &config.area_base_url {
        Some(base) => AreaClient::with_base_url(base)?,
        None => AreaClient::new()?,
    };
    let catalogue = client.fetch().await?;
    let directory = AreaDirectory::from_catalogue(&catalogue);
    store.cache_regions(directory.entries())?;
    tracing::info!("cached {} regions", directory.len());
    Ok(directory)
}

async fn run_fetch(
    config: &Config,
    store: &mut ForecastStore,
    directory: &AreaDirectory,
    zone_code: &str,
) -> Result<()> {
    let Some(entry) = directory.lookup(zone_code) else {
        bail!("unknown zone code {zone_code}; run without arguments to list zones");
    };

    let client = match &config.forecast_base_url {
        Some(base) => ForecastClient::with_base_url(base)?,
        None => ForecastClient::new()?,
    };
    let editions = client.fetch(&entry.office_code).await?;

    let options = MergeOptions {
        keep_pop_only_dates: config.keep_pop_only_dates,
    };
    let merged = merge(&editions, &entry.zone_code, &entry.office_code, &options);
    let records: Vec<DailyRecord> = merged.into_values().collect();
    if records.is_empty() {
        bail!("the forecast for {} produced no records", entry.zone_name);
    }

    let fetched_at = Utc::now();
    store.append(&entry.zone_code, fetched_at, &records)?;

    println!("{} ({})", entry.zone_name, entry.office_name);
    for record in store.latest(&entry.zone_code)? {
        println!("{}", render_record(&record));
    }

    let history = store.history(&entry.zone_code)?;
    println!(
        "{} snapshot(s) stored, latest {}",
        history.len(),
        history
            .first()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    );
    Ok(())
}

fn print_regions(directory: &AreaDirectory) {
    println!("Usage: tenki <zone-code>\n");
    for entry in directory.entries() {
        println!("{}  {} - {}", entry.zone_code, entry.office_name, entry.zone_name);
    }
}

fn render_record(record: &DailyRecord) -> String {
    let temp = |value: Option<f64>| match value {
        Some(v) => format!("{v}°C"),
        None => "--".to_string(),
    };
    let pop = match record.pop {
        Some(p) => format!("{p}%"),
        None => "--".to_string(),
    };

    format!(
        "{}  {}  最高 {} / 最低 {}  降水確率 {}",
        record.date,
        record.weather.as_deref().unwrap_or("--"),
        temp(record.temp_max),
        temp(record.temp_min),
        pop,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_full_record() {
        let record = DailyRecord {
            date: chrono::NaiveDate::from_ymd_opt(2026, 8, 6).unwrap_or_default(),
            weather: Some("くもり".to_string()),
            weather_code: Some("200".to_string()),
            pop: Some(30),
            temp_max: Some(30.0),
            temp_min: Some(23.0),
        };

        let line = render_record(&record);
        assert!(line.contains("くもり"));
        assert!(line.contains("30°C"));
        assert!(line.contains("30%"));
    }

    #[test]
    fn test_render_sparse_record_uses_placeholders() {
        let record = DailyRecord {
            date: chrono::NaiveDate::from_ymd_opt(2026, 8, 10).unwrap_or_default(),
            weather: None,
            weather_code: None,
            pop: None,
            temp_max: Some(20.0),
            temp_min: None,
        };

        let line = render_record(&record);
        assert!(line.contains("最低 --"));
        assert!(line.contains("降水確率 --"));
    }
}
