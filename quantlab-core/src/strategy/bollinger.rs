//! Bollinger band breakout: trades the close piercing a band.
//!
//! The band window includes the current close and uses the population
//! standard deviation. BUY fires when the close drops below the lower
//! band having been at or above it on the previous bar; SELL mirrors
//! that at the upper band.

use super::Strategy;
use crate::domain::{Bar, Signal, SignalKind};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    num_std: f64,
    name: String,
    history: HashMap<String, Vec<f64>>,
}

impl BollingerBands {
    pub fn new(period: usize, num_std: f64) -> Self {
        assert!(period >= 2, "period must be >= 2");
        assert!(num_std > 0.0, "num_std must be positive");
        Self {
            period,
            num_std,
            name: format!("bollinger_bands_{period}"),
            history: HashMap::new(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

impl Strategy for BollingerBands {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_bar(&mut self, bar: &Bar) -> Option<Signal> {
        self.history
            .entry(bar.symbol.clone())
            .or_default()
            .push(bar.close);
        let prices = &self.history[&bar.symbol];

        if prices.len() < self.period + 1 {
            return None;
        }

        let window = &prices[prices.len() - self.period..];
        let sma = mean(window);
        let std = population_std(window);
        let upper = sma + std * self.num_std;
        let lower = sma - std * self.num_std;

        let prev_close = prices[prices.len() - 2];
        let curr_close = prices[prices.len() - 1];

        if prev_close >= lower && curr_close < lower {
            Some(Signal::new(
                &bar.symbol,
                SignalKind::Buy,
                bar.timestamp,
                bar.close,
                "Price touched lower Bollinger Band",
            ))
        } else if prev_close <= upper && curr_close > upper {
            Some(Signal::new(
                &bar.symbol,
                SignalKind::Sell,
                bar.timestamp,
                bar.close,
                "Price touched upper Bollinger Band",
            ))
        } else {
            None
        }
    }
}
