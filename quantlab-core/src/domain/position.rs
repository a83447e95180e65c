//! Position: an open holding under weighted-average-cost accounting.

use serde::{Deserialize, Serialize};

/// An open position in one symbol.
///
/// Two derived fields are kept in sync with `last_price`:
/// `market_value = quantity * last_price` and
/// `unrealized_pnl = (last_price - avg_cost) * quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub avg_cost: f64,
    pub last_price: f64,
    pub market_value: f64,
    pub unrealized_pnl: f64,
}

impl Position {
    /// Open a new position at its first fill price.
    pub fn open(symbol: impl Into<String>, quantity: f64, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            avg_cost: price,
            last_price: price,
            market_value: quantity * price,
            unrealized_pnl: 0.0,
        }
    }

    /// Mark the position to a new price, refreshing derived fields.
    pub fn update_price(&mut self, price: f64) {
        self.last_price = price;
        self.market_value = self.quantity * price;
        self.unrealized_pnl = (price - self.avg_cost) * self.quantity;
    }

    /// Fold an additional BUY fill into the weighted-average cost.
    pub fn add(&mut self, quantity: f64, price: f64) {
        let total_cost = self.quantity * self.avg_cost + quantity * price;
        self.quantity += quantity;
        self.avg_cost = if self.quantity > 0.0 {
            total_cost / self.quantity
        } else {
            0.0
        };
        self.update_price(self.last_price);
    }

    /// Reduce the position by a partial SELL. Average cost is unchanged.
    pub fn reduce(&mut self, quantity: f64) {
        self.quantity -= quantity;
        self.update_price(self.last_price);
    }
}
