//! Trade: the recorded execution of an approved fill.

use super::signal::Side;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One fill, appended to the ledger's trade log and never mutated.
///
/// `realized_pnl` is zero for BUY fills; a SELL realizes
/// `(price - avg_cost) * quantity_closed - commission` against the
/// position's pre-trade average cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
    pub timestamp: NaiveDate,
    pub commission: f64,
    pub realized_pnl: f64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.realized_pnl > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.realized_pnl < 0.0
    }
}
