//! Price and open-interest provider traits.

use crate::error::ProviderError;
use crate::types::PriceSeries;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trait for historical price sources.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch candles for `symbol` covering `[start, end]` (inclusive),
    /// ordered oldest to newest.
    ///
    /// An empty range is `Err(ProviderError::NoData)`, never an empty
    /// series dressed up as success.
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Aggregate open interest on both sides of the market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenInterest {
    /// Total size of open long positions
    pub long: f64,
    /// Total size of open short positions
    pub short: f64,
}

impl OpenInterest {
    /// Long/short ratio, used as a sentiment proxy. `None` when the short
    /// side is empty.
    pub fn long_short_ratio(&self) -> Option<f64> {
        if self.short > 0.0 {
            Some(self.long / self.short)
        } else {
            None
        }
    }
}

/// Trait for open-interest (sentiment) sources.
#[async_trait]
pub trait OpenInterestProvider: Send + Sync {
    /// Fetch current long and short open interest for `symbol`.
    async fn fetch_open_interest(&self, symbol: &str) -> Result<OpenInterest, ProviderError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_short_ratio() {
        let oi = OpenInterest {
            long: 300.0,
            short: 200.0,
        };
        assert!((oi.long_short_ratio().unwrap() - 1.5).abs() < 1e-12);

        let empty_short = OpenInterest {
            long: 300.0,
            short: 0.0,
        };
        assert!(empty_short.long_short_ratio().is_none());
    }
}
