//! Copin open-interest provider.

use async_trait::async_trait;
use hedge_core::error::ProviderError;
use hedge_core::traits::{OpenInterest, OpenInterestProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::retry::{with_retry, RetryPolicy};

#[derive(Serialize)]
struct OiQuery<'a> {
    pagination: Pagination,
    queries: Vec<FieldQuery<'a>>,
    #[serde(rename = "sortBy")]
    sort_by: &'a str,
    #[serde(rename = "sortType")]
    sort_type: &'a str,
}

#[derive(Serialize)]
struct Pagination {
    limit: u32,
    offset: u32,
}

#[derive(Serialize)]
struct FieldQuery<'a> {
    #[serde(rename = "fieldName")]
    field_name: &'a str,
    value: &'a str,
}

#[derive(Deserialize)]
struct OiResponse {
    data: Vec<OiPosition>,
}

#[derive(Deserialize)]
struct OiPosition {
    size: f64,
}

/// Aggregate open interest per market side, summed over the largest
/// positions reported by the Copin API.
pub struct CopinProvider {
    client: Client,
    url: String,
    retry: RetryPolicy,
}

impl CopinProvider {
    /// Create a provider posting to the given query URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_side(&self, symbol: &str, is_long: bool) -> Result<f64, ProviderError> {
        // The API keys markets as PAIR-USDT
        let pair = format!("{symbol}-USDT");
        let body = OiQuery {
            pagination: Pagination {
                limit: 500,
                offset: 0,
            },
            queries: vec![
                FieldQuery {
                    field_name: "pair",
                    value: &pair,
                },
                FieldQuery {
                    field_name: "isLong",
                    value: if is_long { "true" } else { "false" },
                },
            ],
            sort_by: "size",
            sort_type: "desc",
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

        let parsed: OiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(parsed.data.iter().map(|p| p.size).sum())
    }
}

#[async_trait]
impl OpenInterestProvider for CopinProvider {
    async fn fetch_open_interest(&self, symbol: &str) -> Result<OpenInterest, ProviderError> {
        let long = with_retry("copin", &self.retry, || self.fetch_side(symbol, true)).await?;
        let short = with_retry("copin", &self.retry, || self.fetch_side(symbol, false)).await?;

        debug!(symbol, long, short, "fetched open interest");
        Ok(OpenInterest { long, short })
    }

    fn name(&self) -> &str {
        "copin"
    }
}
