//! EquityPoint: one revaluation snapshot on the equity curve.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point on the ledger's equity curve.
///
/// The accounting identity `value == cash + positions_value` holds at
/// every point (up to floating-point epsilon). The curve is a log, not a
/// cache: revaluing twice with identical prices appends two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: NaiveDate,
    pub value: f64,
    pub cash: f64,
    pub positions_value: f64,
}
