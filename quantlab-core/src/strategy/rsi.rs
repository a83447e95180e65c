//! RSI mean-reversion: buys the exit from oversold, sells the exit from
//! overbought.
//!
//! RSI here uses plain rolling means of gains and losses over the period
//! (not Wilder smoothing). With zero losses in the window RSI is 100;
//! zero gains gives 0; a window with no movement at all is undefined and
//! produces no signal.

use super::Strategy;
use crate::domain::{Bar, Signal, SignalKind};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    oversold: f64,
    overbought: f64,
    name: String,
    history: HashMap<String, Vec<f64>>,
}

impl Rsi {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Self {
        assert!(period >= 1, "period must be >= 1");
        assert!(oversold < overbought, "oversold must be below overbought");
        Self {
            period,
            oversold,
            overbought,
            name: format!("rsi_{period}"),
            history: HashMap::new(),
        }
    }

    /// RSI at the price index `end` (inclusive), or `None` when the
    /// window had no movement.
    fn rsi_at(&self, prices: &[f64], end: usize) -> Option<f64> {
        let mut gain = 0.0;
        let mut loss = 0.0;
        for t in end + 1 - self.period..=end {
            let delta = prices[t] - prices[t - 1];
            if delta > 0.0 {
                gain += delta;
            } else {
                loss -= delta;
            }
        }
        if gain == 0.0 && loss == 0.0 {
            return None;
        }
        if loss == 0.0 {
            return Some(100.0);
        }
        let rs = gain / loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

impl Strategy for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_bar(&mut self, bar: &Bar) -> Option<Signal> {
        self.history
            .entry(bar.symbol.clone())
            .or_default()
            .push(bar.close);
        let prices = &self.history[&bar.symbol];

        // Two consecutive RSI values need period+2 closes.
        if prices.len() < self.period + 2 {
            return None;
        }

        let curr = self.rsi_at(prices, prices.len() - 1)?;
        let prev = self.rsi_at(prices, prices.len() - 2)?;

        if prev <= self.oversold && curr > self.oversold {
            Some(Signal::new(
                &bar.symbol,
                SignalKind::Buy,
                bar.timestamp,
                bar.close,
                format!("RSI crossed above {}", self.oversold),
            ))
        } else if prev >= self.overbought && curr < self.overbought {
            Some(Signal::new(
                &bar.symbol,
                SignalKind::Sell,
                bar.timestamp,
                bar.close,
                format!("RSI crossed below {}", self.overbought),
            ))
        } else {
            None
        }
    }
}
