//! Deterministic decision sources for tests and replays.

use async_trait::async_trait;
use chrono::NaiveDate;
use hedge_core::error::{DecisionError, EngineError, EngineResult};
use hedge_core::traits::DecisionSource;
use hedge_core::types::{Decision, LedgerSnapshot};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

/// Feeds a fixed sequence of decisions, one per call, holding once the
/// script runs out.
pub struct ScriptedSource {
    decisions: Mutex<VecDeque<Decision>>,
}

impl ScriptedSource {
    /// Create a source from a decision sequence.
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self {
            decisions: Mutex::new(decisions.into()),
        }
    }

    /// Decisions not yet consumed.
    pub fn remaining(&self) -> usize {
        self.decisions.lock().expect("script lock poisoned").len()
    }
}

#[async_trait]
impl DecisionSource for ScriptedSource {
    async fn decide(
        &self,
        _symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
        _ledger: &LedgerSnapshot,
    ) -> Result<Decision, DecisionError> {
        let next = self
            .decisions
            .lock()
            .expect("script lock poisoned")
            .pop_front();
        Ok(next.unwrap_or_else(Decision::hold))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Replays decisions recorded to a JSON file (an array of
/// `{"action", "quantity"}` objects, one per simulated date).
pub struct ReplaySource {
    inner: ScriptedSource,
}

impl ReplaySource {
    /// Load a decision file.
    pub fn from_path(path: impl AsRef<Path>) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let decisions: Vec<Decision> =
            serde_json::from_str(&contents).map_err(EngineError::Serialization)?;
        Ok(Self {
            inner: ScriptedSource::new(decisions),
        })
    }
}

#[async_trait]
impl DecisionSource for ReplaySource {
    async fn decide(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        ledger: &LedgerSnapshot,
    ) -> Result<Decision, DecisionError> {
        self.inner.decide(symbol, start, end, ledger).await
    }

    fn name(&self) -> &str {
        "replay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedge_core::types::TradeAction;
    use std::io::Write;

    fn snapshot() -> LedgerSnapshot {
        LedgerSnapshot {
            cash: 100_000.0,
            collateral_long: 0.0,
            collateral_short: 0.0,
            entry_price: 0.0,
            leverage: 10.0,
            risk_fraction: 0.05,
            portfolio_value: 100_000.0,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_scripted_sequence_then_hold() {
        let source = ScriptedSource::new(vec![Decision::long(1000.0), Decision::short(500.0)]);
        let snapshot = snapshot();

        let first = source.decide("BTC", date(), date(), &snapshot).await.unwrap();
        assert_eq!(first.action, TradeAction::Long);

        let second = source.decide("BTC", date(), date(), &snapshot).await.unwrap();
        assert_eq!(second.action, TradeAction::Short);
        assert_eq!(source.remaining(), 0);

        let exhausted = source.decide("BTC", date(), date(), &snapshot).await.unwrap();
        assert_eq!(exhausted, Decision::hold());
    }

    #[tokio::test]
    async fn test_replay_from_file() {
        let path = std::env::temp_dir().join("hedge_replay_decisions.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"[{"action": "long", "quantity": 1000.0}, {"action": "hold", "quantity": 0.0}]"#,
        )
        .unwrap();

        let source = ReplaySource::from_path(&path).unwrap();
        let snapshot = snapshot();

        let first = source.decide("BTC", date(), date(), &snapshot).await.unwrap();
        assert_eq!(first, Decision::long(1000.0));
    }

    #[test]
    fn test_replay_rejects_malformed_file() {
        let path = std::env::temp_dir().join("hedge_replay_bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(ReplaySource::from_path(&path).is_err());
    }
}
