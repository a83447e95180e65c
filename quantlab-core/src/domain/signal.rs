//! Signal: a strategy's recommendation in response to a bar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What the strategy recommends for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
}

/// Order side for a fill. Distinct from `SignalKind`: a `Hold` never
/// reaches the ledger, so fills only know Buy/Sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

/// A trade recommendation emitted by a strategy for one bar.
///
/// Produced at most once per bar per instrument and consumed immediately
/// by the engine; signals are not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub kind: SignalKind,
    pub timestamp: NaiveDate,
    pub price: f64,
    /// Requested quantity; `None` lets the risk gate size the position.
    pub quantity: Option<f64>,
    pub reason: String,
}

impl Signal {
    pub fn new(
        symbol: impl Into<String>,
        kind: SignalKind,
        timestamp: NaiveDate,
        price: f64,
        reason: impl Into<String>,
    ) -> Self {
        let signal = Self {
            symbol: symbol.into(),
            kind,
            timestamp,
            price,
            quantity: None,
            reason: reason.into(),
        };
        debug_assert!(signal.kind == SignalKind::Hold || signal.price > 0.0);
        signal
    }

    /// The order side this signal maps to. `None` for holds.
    pub fn side(&self) -> Option<Side> {
        match self.kind {
            SignalKind::Buy => Some(Side::Buy),
            SignalKind::Sell => Some(Side::Sell),
            SignalKind::Hold => None,
        }
    }
}
