//! Portfolio ledger: the sole owner and mutator of money and position state.
//!
//! The ledger tracks cash, open positions, the append-only trade log, and
//! the equity curve. Accounting identity at every equity point:
//! `value == cash + sum(position market values)`.
//!
//! Callers are expected to validate fills before they reach `apply_fill`
//! (the risk gate rejects oversells); the ledger itself only debug-asserts
//! that contract.

use crate::domain::{EquityPoint, Position, Side, Symbol, Trade};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Cash, positions, trade history, and equity curve for one run.
#[derive(Debug, Clone)]
pub struct Ledger {
    initial_capital: f64,
    cash: f64,
    positions: HashMap<Symbol, Position>,
    trades: Vec<Trade>,
    equity_curve: Vec<EquityPoint>,
    portfolio_value: f64,
    peak_value: f64,
}

impl Ledger {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            cash: initial_capital,
            positions: HashMap::new(),
            trades: Vec::new(),
            equity_curve: Vec::new(),
            portfolio_value: initial_capital,
            peak_value: initial_capital,
        }
    }

    /// Apply a validated fill to cash and positions, and append a Trade.
    ///
    /// BUY: opens or re-averages the position and debits
    /// `quantity * price + commission` from cash.
    /// SELL: realizes P&L against the pre-trade average cost, removes the
    /// position when fully closed (quantity reduced to the held amount if
    /// the caller oversold: a contract violation caught by debug_assert),
    /// and credits `quantity * price - commission` to cash.
    pub fn apply_fill(
        &mut self,
        symbol: &str,
        quantity: f64,
        price: f64,
        side: Side,
        commission: f64,
        timestamp: NaiveDate,
    ) {
        match side {
            Side::Buy => {
                match self.positions.get_mut(symbol) {
                    Some(pos) => pos.add(quantity, price),
                    None => {
                        self.positions
                            .insert(symbol.to_string(), Position::open(symbol, quantity, price));
                    }
                }
                self.cash -= quantity * price + commission;
                self.trades.push(Trade {
                    symbol: symbol.to_string(),
                    side,
                    quantity,
                    price,
                    timestamp,
                    commission,
                    realized_pnl: 0.0,
                });
            }
            Side::Sell => {
                let Some(pos) = self.positions.get_mut(symbol) else {
                    debug_assert!(false, "SELL {symbol} without an open position");
                    return;
                };
                debug_assert!(
                    quantity <= pos.quantity,
                    "SELL {symbol} quantity exceeds held shares"
                );
                let closed = quantity.min(pos.quantity);
                let realized_pnl = (price - pos.avg_cost) * closed - commission;

                if quantity >= pos.quantity {
                    self.positions.remove(symbol);
                } else {
                    pos.reduce(quantity);
                }

                self.cash += quantity * price - commission;
                self.trades.push(Trade {
                    symbol: symbol.to_string(),
                    side,
                    quantity,
                    price,
                    timestamp,
                    commission,
                    realized_pnl,
                });
            }
        }
    }

    /// Mark open positions to the given prices and append one EquityPoint.
    ///
    /// Positions absent from `prices` keep their last known price. The
    /// peak value ratchets up on new highs. Calling twice with identical
    /// prices appends two identical points: the curve is a log.
    pub fn revalue(&mut self, timestamp: NaiveDate, prices: &HashMap<Symbol, f64>) {
        for (symbol, price) in prices {
            if let Some(pos) = self.positions.get_mut(symbol) {
                pos.update_price(*price);
            }
        }

        let positions_value: f64 = self.positions.values().map(|p| p.market_value).sum();
        self.portfolio_value = self.cash + positions_value;

        if self.portfolio_value > self.peak_value {
            self.peak_value = self.portfolio_value;
        }

        self.equity_curve.push(EquityPoint {
            timestamp,
            value: self.portfolio_value,
            cash: self.cash,
            positions_value,
        });
    }

    pub fn has_position(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn positions(&self) -> &HashMap<Symbol, Position> {
        &self.positions
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn portfolio_value(&self) -> f64 {
        self.portfolio_value
    }

    pub fn peak_value(&self) -> f64 {
        self.peak_value
    }

    /// Fractional return since construction.
    pub fn total_return(&self) -> f64 {
        if self.initial_capital == 0.0 {
            return 0.0;
        }
        (self.portfolio_value - self.initial_capital) / self.initial_capital
    }

    /// Fractional decline from the running peak, in [0, 1].
    pub fn drawdown(&self) -> f64 {
        if self.peak_value == 0.0 {
            return 0.0;
        }
        (self.peak_value - self.portfolio_value) / self.peak_value
    }
}
