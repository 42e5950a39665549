//! Open-interest sentiment signal.

use hedge_core::traits::OpenInterest;
use serde::Serialize;
use std::fmt;

/// Directional market signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for MarketSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketSignal::Bullish => write!(f, "bullish"),
            MarketSignal::Bearish => write!(f, "bearish"),
            MarketSignal::Neutral => write!(f, "neutral"),
        }
    }
}

/// Sentiment derived from the long/short open-interest imbalance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentSignal {
    pub signal: MarketSignal,
    /// Share of open interest agreeing with the signal, in [0, 1]
    pub confidence: f64,
    pub long_oi: f64,
    pub short_oi: f64,
}

/// Classify open interest into a directional signal. More longs than
/// shorts reads bullish; confidence is the dominant side's share.
pub fn assess_sentiment(oi: &OpenInterest) -> SentimentSignal {
    let total = oi.long + oi.short;
    if total <= 0.0 {
        return SentimentSignal {
            signal: MarketSignal::Neutral,
            confidence: 0.0,
            long_oi: oi.long,
            short_oi: oi.short,
        };
    }

    let bull_share = oi.long / total;
    let bear_share = oi.short / total;

    let signal = if oi.long > oi.short {
        MarketSignal::Bullish
    } else if oi.long < oi.short {
        MarketSignal::Bearish
    } else {
        MarketSignal::Neutral
    };

    SentimentSignal {
        signal,
        confidence: bull_share.max(bear_share),
        long_oi: oi.long,
        short_oi: oi.short,
    }
}
