//! Binance futures continuous-klines provider.

use async_trait::async_trait;
use chrono::NaiveDate;
use hedge_core::error::ProviderError;
use hedge_core::traits::PriceProvider;
use hedge_core::types::{Bar, PriceSeries};
use reqwest::Client;
use tracing::debug;

use crate::retry::{with_retry, RetryPolicy};
use crate::date_to_millis;

/// One kline row: [open_time, open, high, low, close, volume, close_time,
/// quote_volume, trade_count, taker_base, taker_quote, ignore].
type KlineRow = (
    i64,
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    u64,
    String,
    String,
    String,
);

fn parse_field(field: &str, value: &str) -> Result<f64, ProviderError> {
    value
        .parse::<f64>()
        .map_err(|e| ProviderError::Parse(format!("kline field {field}={value}: {e}")))
}

fn parse_klines(rows: Vec<KlineRow>) -> Result<Vec<Bar>, ProviderError> {
    rows.into_iter()
        .map(|row| {
            Ok(Bar::new(
                row.0,
                parse_field("open", &row.1)?,
                parse_field("high", &row.2)?,
                parse_field("low", &row.3)?,
                parse_field("close", &row.4)?,
                parse_field("volume", &row.5)?,
            ))
        })
        .collect()
}

/// Hourly perpetual-futures klines; a secondary price source with the
/// same contract as the HyperLiquid provider.
pub struct BinanceProvider {
    client: Client,
    base_url: String,
    limit: u32,
    retry: RetryPolicy,
}

impl BinanceProvider {
    /// Create a provider against the given futures API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            limit: 1000,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the maximum number of klines per request.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_once(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<KlineRow>, ProviderError> {
        let url = format!("{}/fapi/v1/continuousKlines", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("pair", symbol),
                ("contractType", "PERPETUAL"),
                ("interval", "1h"),
                ("startTime", &date_to_millis(start).to_string()),
                ("endTime", &date_to_millis(end).to_string()),
                ("limit", &self.limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        response
            .json::<Vec<KlineRow>>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PriceProvider for BinanceProvider {
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let rows = with_retry("binance", &self.retry, || {
            self.fetch_once(symbol, start, end)
        })
        .await?;

        if rows.is_empty() {
            return Err(ProviderError::NoData);
        }

        let bars = parse_klines(rows)?;
        debug!(symbol, %start, %end, bars = bars.len(), "fetched klines");
        Ok(PriceSeries::from_bars(symbol, bars))
    }

    fn name(&self) -> &str {
        "binance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_klines() {
        let rows: Vec<KlineRow> = serde_json::from_str(
            r#"[
                [1700000000000, "37000.5", "37200.1", "36900.9", "37100.0",
                 "123.45", 1700003599999, "4567890.1", 821, "60.2", "2233445.6", "0"]
            ]"#,
        )
        .unwrap();

        let bars = parse_klines(rows).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].timestamp, 1_700_000_000_000);
        assert!((bars[0].high - 37_200.1).abs() < 1e-9);
        assert!((bars[0].volume - 123.45).abs() < 1e-9);
    }
}
