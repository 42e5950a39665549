//! Decision source trait.

use crate::error::DecisionError;
use crate::types::{Decision, LedgerSnapshot};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for the external decision pipeline.
///
/// Implementations range from an LLM-backed pipeline to a scripted
/// sequence for deterministic tests. A source that fails must say so
/// through the error type; returning a fabricated hold would mask the
/// failure from the caller.
#[async_trait]
pub trait DecisionSource: Send + Sync {
    /// Produce a decision for `symbol` given the lookback window
    /// `[start, end]` and a read-only ledger snapshot.
    async fn decide(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        ledger: &LedgerSnapshot,
    ) -> Result<Decision, DecisionError>;

    /// Get the source name.
    fn name(&self) -> &str;
}
