//! Price and open-interest providers.
//!
//! HTTP-backed sources for HyperLiquid candles, Binance continuous
//! klines, and Copin open interest, plus a CSV source for offline runs.
//! All network calls go through a shared timeout + bounded-retry wrapper.

mod binance;
mod copin;
mod csv_source;
mod hyperliquid;
mod retry;

pub use binance::BinanceProvider;
pub use copin::CopinProvider;
pub use csv_source::CsvPriceSource;
pub use hyperliquid::HyperliquidProvider;
pub use retry::RetryPolicy;

use chrono::NaiveDate;

/// Millisecond timestamp at midnight UTC of `date`.
pub(crate) fn date_to_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
        .timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_to_millis() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(date_to_millis(date), 1_705_276_800_000);
    }
}
