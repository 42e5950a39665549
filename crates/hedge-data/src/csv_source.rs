//! CSV price source for offline and deterministic runs.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use hedge_core::error::ProviderError;
use hedge_core::traits::PriceProvider;
use hedge_core::types::{Bar, PriceSeries};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Serves candles from a local CSV file, filtered to the requested range.
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    /// Create a source for the given file.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ProviderError::NoData);
        }
        Ok(Self { path })
    }

    fn load_all(&self) -> Result<Vec<Bar>, ProviderError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let mut bars = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| ProviderError::Parse(e.to_string()))?;
            bars.push(Bar::new(
                parse_timestamp(&record.date)?,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }
        Ok(bars)
    }
}

/// Parse various timestamp formats to Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, ProviderError> {
    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        let dt = d.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        return Ok(dt.and_utc().timestamp_millis());
    }

    // Bare integers are Unix timestamps; assume milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return Ok(ts * 1000);
    }

    Err(ProviderError::Parse(format!(
        "Could not parse date: {date_str}"
    )))
}

#[async_trait]
impl PriceProvider for CsvPriceSource {
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let start_ms = crate::date_to_millis(start);
        // Inclusive of the whole end date
        let end_ms = crate::date_to_millis(end + chrono::Days::new(1));

        let bars: Vec<Bar> = self
            .load_all()?
            .into_iter()
            .filter(|b| b.timestamp >= start_ms && b.timestamp < end_ms)
            .collect();

        if bars.is_empty() {
            return Err(ProviderError::NoData);
        }
        Ok(PriceSeries::from_bars(symbol, bars))
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-01-15").unwrap(), 1_705_276_800_000);
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_fetch_filters_range() {
        let path = write_fixture(
            "hedge_csv_source_range.csv",
            "date,open,high,low,close,volume\n\
             2024-06-01,10,11,9,10.5,100\n\
             2024-06-02,10.5,12,10,11.5,120\n\
             2024-06-03,11.5,13,11,12.5,90\n",
        );
        let source = CsvPriceSource::new(&path).unwrap();

        let series = source
            .fetch(
                "BTC",
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(series.len(), 2);
        assert!((series.last_close().unwrap() - 11.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fetch_empty_range_is_no_data() {
        let path = write_fixture(
            "hedge_csv_source_empty.csv",
            "date,open,high,low,close,volume\n2024-06-01,10,11,9,10.5,100\n",
        );
        let source = CsvPriceSource::new(&path).unwrap();

        let result = source
            .fetch(
                "BTC",
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            )
            .await;

        assert!(matches!(result, Err(ProviderError::NoData)));
    }

    #[test]
    fn test_missing_file_rejected() {
        assert!(matches!(
            CsvPriceSource::new("/nonexistent/prices.csv"),
            Err(ProviderError::NoData)
        ));
    }
}
