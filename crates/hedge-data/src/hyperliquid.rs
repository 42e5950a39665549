//! HyperLiquid candle snapshot provider.

use async_trait::async_trait;
use chrono::NaiveDate;
use hedge_core::error::ProviderError;
use hedge_core::traits::PriceProvider;
use hedge_core::types::{Bar, PriceSeries};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::retry::{with_retry, RetryPolicy};
use crate::date_to_millis;

#[derive(Serialize)]
struct CandleRequest<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    req: CandleReq<'a>,
}

#[derive(Serialize)]
struct CandleReq<'a> {
    coin: &'a str,
    interval: &'a str,
    #[serde(rename = "startTime")]
    start_time: i64,
    #[serde(rename = "endTime")]
    end_time: i64,
}

/// Raw candle as returned by the API; numeric fields arrive as strings.
#[derive(Debug, Deserialize)]
struct RawCandle {
    t: i64,
    o: String,
    h: String,
    l: String,
    c: String,
    v: String,
}

fn parse_price(field: &str, value: &str) -> Result<f64, ProviderError> {
    value
        .parse::<f64>()
        .map_err(|e| ProviderError::Parse(format!("candle field {field}={value}: {e}")))
}

fn parse_candles(raw: Vec<RawCandle>) -> Result<Vec<Bar>, ProviderError> {
    raw.into_iter()
        .map(|c| {
            Ok(Bar::new(
                c.t,
                parse_price("o", &c.o)?,
                parse_price("h", &c.h)?,
                parse_price("l", &c.l)?,
                parse_price("c", &c.c)?,
                parse_price("v", &c.v)?,
            ))
        })
        .collect()
}

/// Hourly candle history from the HyperLiquid info endpoint.
pub struct HyperliquidProvider {
    client: Client,
    url: String,
    interval: String,
    retry: RetryPolicy,
}

impl HyperliquidProvider {
    /// Create a provider posting to the given info URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            interval: "1h".to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the candle interval (default 1h).
    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
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
    ) -> Result<Vec<RawCandle>, ProviderError> {
        let body = CandleRequest {
            kind: "candleSnapshot",
            req: CandleReq {
                coin: symbol,
                interval: &self.interval,
                start_time: date_to_millis(start),
                end_time: date_to_millis(end),
            },
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        response
            .json::<Vec<RawCandle>>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PriceProvider for HyperliquidProvider {
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let raw = with_retry("hyperliquid", &self.retry, || {
            self.fetch_once(symbol, start, end)
        })
        .await?;

        if raw.is_empty() {
            return Err(ProviderError::NoData);
        }

        let bars = parse_candles(raw)?;
        debug!(symbol, %start, %end, bars = bars.len(), "fetched candles");
        Ok(PriceSeries::from_bars(symbol, bars))
    }

    fn name(&self) -> &str {
        "hyperliquid"
    }
}
