//! Risk gate: admission control between raw signals and fills.
//!
//! The gate is stateless with respect to the portfolio: it owns only its
//! limits and reads ledger state per call. It never mutates the ledger.

use crate::domain::{Side, Signal};
use crate::ledger::Ledger;
use serde::{Deserialize, Serialize};

/// Risk limits expressed as fractions of portfolio value.
///
/// Missing fields deserialize to the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskLimits {
    /// Cap on any single position as a fraction of portfolio value.
    pub max_position_fraction: f64,
    /// Drawdown beyond which new BUYs are rejected and the run halts.
    pub max_drawdown: f64,
    /// Fraction of portfolio value risked per trade when sizing.
    pub risk_fraction: f64,
    /// Assumed stop distance as a fraction of entry price.
    pub stop_loss_fraction: f64,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_position_fraction: 0.10,
            max_drawdown: 0.20,
            risk_fraction: 0.02,
            stop_loss_fraction: 0.02,
        }
    }
}

/// Verdict on one signal. `reason` is set only on rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admission {
    pub approved: bool,
    pub reason: Option<String>,
}

impl Admission {
    fn approve() -> Self {
        Self {
            approved: true,
            reason: None,
        }
    }

    fn reject(reason: impl Into<String>) -> Self {
        Self {
            approved: false,
            reason: Some(reason.into()),
        }
    }
}

/// Admission control and position sizing against a set of [`RiskLimits`].
#[derive(Debug, Clone, Default)]
pub struct RiskGate {
    limits: RiskLimits,
}

impl RiskGate {
    pub fn new(limits: RiskLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Whole-share quantity for a new BUY: the lesser of the risk-based
    /// size and the position-cap size, floored. Zero when the per-share
    /// risk is zero (degenerate price or stop fraction).
    pub fn size_position(&self, ledger: &Ledger, price: f64) -> f64 {
        let value = ledger.portfolio_value();
        let risk_per_share = price * self.limits.stop_loss_fraction;
        if risk_per_share == 0.0 {
            return 0.0;
        }
        let risk_amount = value * self.limits.risk_fraction;
        let by_risk = (risk_amount / risk_per_share).floor();
        let by_cap = (value * self.limits.max_position_fraction / price).floor();
        by_risk.min(by_cap)
    }

    /// Decide whether a sized signal may become a fill.
    ///
    /// BUY checks cash sufficiency (cost at signal price), the per-order
    /// position cap, and the drawdown limit. SELL checks that the
    /// position exists and holds enough shares.
    pub fn admit(&self, ledger: &Ledger, signal: &Signal, quantity: f64) -> Admission {
        let symbol = &signal.symbol;
        match signal.side() {
            Some(Side::Buy) => {
                let cost = quantity * signal.price;
                if cost > ledger.cash() {
                    return Admission::reject(format!(
                        "insufficient cash: need {cost:.2}, have {:.2}",
                        ledger.cash()
                    ));
                }

                let cap = ledger.portfolio_value() * self.limits.max_position_fraction;
                if cost > cap {
                    return Admission::reject(format!(
                        "position too large: {cost:.2} exceeds cap {cap:.2}"
                    ));
                }

                let drawdown = ledger.drawdown();
                if drawdown > self.limits.max_drawdown {
                    return Admission::reject(format!(
                        "drawdown limit: {:.2}% exceeds {:.2}%",
                        drawdown * 100.0,
                        self.limits.max_drawdown * 100.0
                    ));
                }

                Admission::approve()
            }
            Some(Side::Sell) => {
                let Some(pos) = ledger.position(symbol) else {
                    return Admission::reject(format!("no position in {symbol}"));
                };
                if quantity > pos.quantity {
                    return Admission::reject(format!(
                        "insufficient shares: selling {quantity}, hold {}",
                        pos.quantity
                    ));
                }
                Admission::approve()
            }
            None => Admission::reject("hold signals are not tradable"),
        }
    }

    /// Whether the run must stop. Checked once per timestamp boundary.
    pub fn should_halt(&self, ledger: &Ledger) -> Option<String> {
        let drawdown = ledger.drawdown();
        if drawdown > self.limits.max_drawdown {
            return Some(format!(
                "max drawdown breached: {:.2}% > {:.2}%",
                drawdown * 100.0,
                self.limits.max_drawdown * 100.0
            ));
        }
        if ledger.cash() < 0.0 {
            return Some(format!("negative cash balance: {:.2}", ledger.cash()));
        }
        None
    }
}
