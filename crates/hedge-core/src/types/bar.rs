//! OHLCV bars and the price series container.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }
}

/// Ordered series of bars for a single symbol.
///
/// Invariant: bars are ascending by timestamp with no duplicates. The
/// constructor sorts and deduplicates; derived views (returns) never
/// mutate the underlying data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Symbol identifier
    pub symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Create an empty series.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// Build a series from unordered bars, sorting by timestamp and
    /// dropping duplicate timestamps (first occurrence wins).
    pub fn from_bars(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// Number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Get the most recent bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Closing price of the most recent bar.
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// All bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Per-bar simple returns `close_t / close_{t-1} - 1`.
    ///
    /// The first bar has no prior close and is dropped, so the result has
    /// `len() - 1` entries. Callers dividing by these values must check
    /// the closes are positive first.
    pub fn returns(&self) -> Vec<f64> {
        self.bars
            .windows(2)
            .map(|w| w[1].close / w[0].close - 1.0)
            .collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar::new(ts, close, close, close, close, 1000.0)
    }

    #[test]
    fn test_from_bars_sorts_and_dedups() {
        let series = PriceSeries::from_bars(
            "BTC",
            vec![bar(3, 30.0), bar(1, 10.0), bar(2, 20.0), bar(1, 11.0)],
        );

        assert_eq!(series.len(), 3);
        assert_eq!(series.get(0).unwrap().timestamp, 1);
        assert_eq!(series.last().unwrap().close, 30.0);
    }

    #[test]
    fn test_returns_drops_first_bar() {
        let series = PriceSeries::from_bars("BTC", vec![bar(1, 100.0), bar(2, 110.0), bar(3, 99.0)]);

        let returns = series.returns();
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.10).abs() < 1e-12);
        assert!((returns[1] - (-0.10)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::new("BTC");
        assert!(series.is_empty());
        assert!(series.last_close().is_none());
        assert!(series.returns().is_empty());
    }
}
