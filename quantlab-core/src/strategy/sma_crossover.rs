//! Simple moving average crossover: golden cross and death cross.
//!
//! Fires BUY when the short SMA crosses above the long SMA between the
//! previous bar and the current one, SELL on the opposite cross. Ties on
//! the previous bar count as "not yet crossed", so a move off an exact
//! tie fires.

use super::Strategy;
use crate::domain::{Bar, Signal, SignalKind};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SmaCrossover {
    short_window: usize,
    long_window: usize,
    name: String,
    history: HashMap<String, Vec<f64>>,
}

impl SmaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        assert!(short_window >= 1, "short_window must be >= 1");
        assert!(
            long_window > short_window,
            "long_window must be > short_window"
        );
        Self {
            short_window,
            long_window,
            name: format!("sma_crossover_{short_window}_{long_window}"),
            history: HashMap::new(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_bar(&mut self, bar: &Bar) -> Option<Signal> {
        let prices = self.history.entry(bar.symbol.clone()).or_default();
        prices.push(bar.close);

        // One extra bar beyond the long window to compare against.
        if prices.len() < self.long_window + 1 {
            return None;
        }

        let curr = &prices[prices.len() - self.long_window..];
        let prev = &prices[prices.len() - self.long_window - 1..prices.len() - 1];

        let sma_short = mean(&curr[curr.len() - self.short_window..]);
        let sma_long = mean(curr);
        let prev_short = mean(&prev[prev.len() - self.short_window..]);
        let prev_long = mean(prev);

        if prev_short <= prev_long && sma_short > sma_long {
            Some(Signal::new(
                &bar.symbol,
                SignalKind::Buy,
                bar.timestamp,
                bar.close,
                "SMA short crossed above long",
            ))
        } else if prev_short >= prev_long && sma_short < sma_long {
            Some(Signal::new(
                &bar.symbol,
                SignalKind::Sell,
                bar.timestamp,
                bar.close,
                "SMA short crossed below long",
            ))
        } else {
            None
        }
    }
}
