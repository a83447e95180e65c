//! Bar: one OHLCV observation for an instrument at a timestamp.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single symbol on a single day.
///
/// Bars are supplied by the data collaborator and treated as immutable,
/// pre-validated input. `is_sane()` is available for callers that want to
/// validate at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub timestamp: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Basic OHLC sanity check: high must cover open/close, low must sit below them.
    pub fn is_sane(&self) -> bool {
        self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
            && self.open > 0.0
            && self.close > 0.0
    }
}
