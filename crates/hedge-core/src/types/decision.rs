//! Trade decisions and execution outcomes.

use crate::error::DecisionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a trade decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Long,
    Short,
    #[default]
    Hold,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Long => write!(f, "long"),
            TradeAction::Short => write!(f, "short"),
            TradeAction::Hold => write!(f, "hold"),
        }
    }
}

/// A trading decision produced by a decision source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: TradeAction,
    /// Cash notional to commit, must be >= 0
    pub quantity: f64,
}

impl Decision {
    /// The no-op decision substituted when a source returns garbage.
    pub fn hold() -> Self {
        Self {
            action: TradeAction::Hold,
            quantity: 0.0,
        }
    }

    pub fn long(quantity: f64) -> Self {
        Self {
            action: TradeAction::Long,
            quantity,
        }
    }

    pub fn short(quantity: f64) -> Self {
        Self {
            action: TradeAction::Short,
            quantity,
        }
    }

    /// Parse a decision from a JSON payload.
    ///
    /// Any shape other than `{"action": "long" | "short" | "hold",
    /// "quantity": <non-negative number>}` is a malformed decision.
    pub fn from_json(payload: &str) -> Result<Self, DecisionError> {
        let decision: Decision = serde_json::from_str(payload)
            .map_err(|e| DecisionError::Malformed(format!("{payload}: {e}")))?;
        if !decision.quantity.is_finite() || decision.quantity < 0.0 {
            return Err(DecisionError::Malformed(format!(
                "quantity must be a non-negative number, got {}",
                decision.quantity
            )));
        }
        Ok(decision)
    }
}

/// Why an open request did not move cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Hold decisions never trade
    Hold,
    /// Market price was zero or negative
    NonPositivePrice,
    /// Requested quantity was zero or negative
    NonPositiveQuantity,
    /// Requested notional exceeds available cash
    InsufficientCash,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Hold => write!(f, "hold"),
            SkipReason::NonPositivePrice => write!(f, "non-positive price"),
            SkipReason::NonPositiveQuantity => write!(f, "non-positive quantity"),
            SkipReason::InsufficientCash => write!(f, "insufficient cash"),
        }
    }
}

/// Outcome of a `PortfolioLedger::open` call.
///
/// Distinguishes an executed trade from a silently skipped one so step
/// logs never report a fill that did not move cash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Execution {
    Filled { quantity: f64 },
    Skipped { requested: f64, reason: SkipReason },
}

impl Execution {
    /// The quantity the caller asked for, filled or not.
    pub fn requested(&self) -> f64 {
        match self {
            Execution::Filled { quantity } => *quantity,
            Execution::Skipped { requested, .. } => *requested,
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Execution::Filled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_decision() {
        let decision = Decision::from_json(r#"{"action": "long", "quantity": 1500.0}"#).unwrap();
        assert_eq!(decision.action, TradeAction::Long);
        assert!((decision.quantity - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_rejects_unknown_action() {
        let err = Decision::from_json(r#"{"action": "yolo", "quantity": 1.0}"#);
        assert!(matches!(err, Err(DecisionError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_negative_quantity() {
        let err = Decision::from_json(r#"{"action": "short", "quantity": -5.0}"#);
        assert!(matches!(err, Err(DecisionError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(Decision::from_json("no decision today").is_err());
        assert!(Decision::from_json("[]").is_err());
    }
}
