//! Leveraged collateral-based portfolio ledger.

use serde::{Deserialize, Serialize};

use super::{Execution, SkipReason, TradeAction};

/// Portfolio state for a leveraged single-asset account.
///
/// Collateral is asset-denominated; cash is quote-denominated. At most one
/// of the two collateral sides is non-zero at any time: the engine fully
/// liquidates before opening, and `open` itself never flips a side.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioLedger {
    cash: f64,
    collateral_long: f64,
    collateral_short: f64,
    /// Entry price of the open position; only meaningful while one is open
    entry_price: f64,
    leverage: f64,
    risk_fraction: f64,
    portfolio_value: f64,
}

impl PortfolioLedger {
    /// Create a ledger with the given starting capital.
    ///
    /// `leverage` must be positive and `risk_fraction` in (0, 1]; callers
    /// validate at the configuration boundary.
    pub fn new(initial_capital: f64, leverage: f64, risk_fraction: f64) -> Self {
        Self {
            cash: initial_capital,
            collateral_long: 0.0,
            collateral_short: 0.0,
            entry_price: 0.0,
            leverage,
            risk_fraction,
            portfolio_value: initial_capital,
        }
    }

    /// Close any open position at `price`, settling into cash.
    ///
    /// A short realizes `collateral * (2 * entry - price)`: the symmetric
    /// payoff where the short loses exactly what the long would gain.
    /// Non-standard, but preserved exactly; changing it changes every
    /// simulation output. Idempotent once no position remains.
    pub fn liquidate(&mut self, price: f64) {
        if self.collateral_short != 0.0 {
            self.cash += self.collateral_short * (2.0 * self.entry_price - price);
            self.collateral_short = 0.0;
        }
        if self.collateral_long != 0.0 {
            self.cash += self.collateral_long * price;
            self.collateral_long = 0.0;
        }
    }

    /// Open a position with `quantity` cash notional at `price`.
    ///
    /// Trades only when the price and quantity are positive and the
    /// quantity is covered by cash; otherwise reports why nothing moved.
    /// A non-positive price would make the collateral division blow up
    /// to infinity, so it never reaches the collateral math.
    pub fn open(&mut self, action: TradeAction, quantity: f64, price: f64) -> Execution {
        if action == TradeAction::Hold {
            return Execution::Skipped {
                requested: quantity,
                reason: SkipReason::Hold,
            };
        }
        if price <= 0.0 {
            return Execution::Skipped {
                requested: quantity,
                reason: SkipReason::NonPositivePrice,
            };
        }
        if quantity <= 0.0 {
            return Execution::Skipped {
                requested: quantity,
                reason: SkipReason::NonPositiveQuantity,
            };
        }
        if self.cash < quantity {
            return Execution::Skipped {
                requested: quantity,
                reason: SkipReason::InsufficientCash,
            };
        }

        let collateral = quantity / price;
        match action {
            TradeAction::Long => self.collateral_long += collateral,
            TradeAction::Short => self.collateral_short += collateral,
            TradeAction::Hold => unreachable!(),
        }
        self.cash -= quantity;
        self.entry_price = price;

        Execution::Filled { quantity }
    }

    /// Mark the portfolio to market at `price`, storing and returning the
    /// total value.
    pub fn mark_to_market(&mut self, price: f64) -> f64 {
        let value = if self.collateral_long > 0.0 {
            self.cash + self.collateral_long * price
        } else if self.collateral_short > 0.0 {
            self.cash + self.collateral_short * (2.0 * self.entry_price - price)
        } else {
            self.cash
        };
        self.portfolio_value = value;
        value
    }

    /// Whether a long or short position is currently open.
    pub fn has_open_position(&self) -> bool {
        self.collateral_long != 0.0 || self.collateral_short != 0.0
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn collateral_long(&self) -> f64 {
        self.collateral_long
    }

    pub fn collateral_short(&self) -> f64 {
        self.collateral_short
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn leverage(&self) -> f64 {
        self.leverage
    }

    pub fn risk_fraction(&self) -> f64 {
        self.risk_fraction
    }

    pub fn portfolio_value(&self) -> f64 {
        self.portfolio_value
    }

    /// Read-only copy handed to decision sources.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            cash: self.cash,
            collateral_long: self.collateral_long,
            collateral_short: self.collateral_short,
            entry_price: self.entry_price,
            leverage: self.leverage,
            risk_fraction: self.risk_fraction,
            portfolio_value: self.portfolio_value,
        }
    }
}

/// Immutable view of the ledger passed to external decision sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub cash: f64,
    pub collateral_long: f64,
    pub collateral_short: f64,
    pub entry_price: f64,
    pub leverage: f64,
    pub risk_fraction: f64,
    pub portfolio_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> PortfolioLedger {
        PortfolioLedger::new(100_000.0, 10.0, 0.05)
    }

    #[test]
    fn test_open_long() {
        let mut ledger = ledger();
        let exec = ledger.open(TradeAction::Long, 1000.0, 10.0);

        assert!(exec.is_filled());
        assert!((ledger.cash() - 99_000.0).abs() < 1e-9);
        assert!((ledger.collateral_long() - 100.0).abs() < 1e-9);
        assert!((ledger.entry_price() - 10.0).abs() < 1e-9);
        assert_eq!(ledger.collateral_short(), 0.0);
    }

    #[test]
    fn test_open_hold_is_noop() {
        let mut ledger = ledger();
        let exec = ledger.open(TradeAction::Hold, 5000.0, 10.0);

        assert_eq!(
            exec,
            Execution::Skipped {
                requested: 5000.0,
                reason: SkipReason::Hold
            }
        );
        assert!((ledger.cash() - 100_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_open_rejects_non_positive_price() {
        let mut ledger = ledger();
        let exec = ledger.open(TradeAction::Long, 1000.0, 0.0);

        assert_eq!(
            exec,
            Execution::Skipped {
                requested: 1000.0,
                reason: SkipReason::NonPositivePrice
            }
        );
        assert!(!ledger.has_open_position());
        assert!((ledger.cash() - 100_000.0).abs() < 1e-9);
        assert!(ledger.mark_to_market(5.0).is_finite());

        let exec = ledger.open(TradeAction::Short, 1000.0, -3.0);
        assert!(!exec.is_filled());
        assert!(ledger.collateral_short().is_finite());
    }

    #[test]
    fn test_open_rejects_insufficient_cash() {
        let mut ledger = ledger();
        let exec = ledger.open(TradeAction::Long, 200_000.0, 10.0);

        assert!(!exec.is_filled());
        assert!((exec.requested() - 200_000.0).abs() < 1e-9);
        assert!(!ledger.has_open_position());
    }

    #[test]
    fn test_liquidate_long() {
        let mut ledger = ledger();
        ledger.open(TradeAction::Long, 1000.0, 10.0);
        ledger.liquidate(20.0);

        // 99000 + 100 * 20
        assert!((ledger.cash() - 101_000.0).abs() < 1e-9);
        assert!(!ledger.has_open_position());
    }

    #[test]
    fn test_liquidate_short_symmetric_payoff() {
        let mut ledger = ledger();
        ledger.open(TradeAction::Short, 1000.0, 10.0);
        // collateral 100 @ entry 10; price drops to 8
        ledger.liquidate(8.0);

        // 99000 + 100 * (2*10 - 8) = 99000 + 1200
        assert!((ledger.cash() - 100_200.0).abs() < 1e-9);
        assert_eq!(ledger.collateral_short(), 0.0);
    }

    #[test]
    fn test_liquidate_is_idempotent() {
        let mut ledger = ledger();
        ledger.open(TradeAction::Long, 1000.0, 10.0);
        ledger.liquidate(12.0);
        let cash = ledger.cash();

        ledger.liquidate(50.0);
        ledger.liquidate(1.0);
        assert!((ledger.cash() - cash).abs() < 1e-12);
    }

    #[test]
    fn test_single_side_invariant() {
        let mut ledger = ledger();
        ledger.open(TradeAction::Long, 1000.0, 10.0);
        ledger.liquidate(11.0);
        ledger.open(TradeAction::Short, 2000.0, 11.0);
        ledger.liquidate(9.0);
        ledger.open(TradeAction::Long, 500.0, 9.0);

        assert!(!(ledger.collateral_long() > 0.0 && ledger.collateral_short() > 0.0));
    }

    #[test]
    fn test_mark_to_market() {
        let mut ledger = ledger();
        assert!((ledger.mark_to_market(10.0) - 100_000.0).abs() < 1e-9);

        ledger.open(TradeAction::Long, 1000.0, 10.0);
        // 99000 + 100 * 15
        assert!((ledger.mark_to_market(15.0) - 100_500.0).abs() < 1e-9);
        assert!((ledger.portfolio_value() - 100_500.0).abs() < 1e-9);

        ledger.liquidate(15.0);
        ledger.open(TradeAction::Short, 1000.0, 15.0);
        // cash 99500, collateral 66.66.. @ 15, price 12:
        // 99500 + 66.66.. * (30 - 12) = 99500 + 1200
        assert!((ledger.mark_to_market(12.0) - 100_700.0).abs() < 1e-6);
    }
}
