//! MACD signal-line crossover.
//!
//! EMAs use the recursive form seeded with the first value and
//! `alpha = 2 / (span + 1)`. The MACD line is fast EMA minus slow EMA and
//! the signal line is an EMA of the MACD line. A cross of the MACD line
//! through the signal line between the previous and current bar fires.

use super::Strategy;
use crate::domain::{Bar, Signal, SignalKind};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    name: String,
    history: HashMap<String, Vec<f64>>,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(
            fast_period >= 1 && fast_period < slow_period,
            "fast_period must be >= 1 and below slow_period"
        );
        assert!(signal_period >= 1, "signal_period must be >= 1");
        Self {
            fast_period,
            slow_period,
            signal_period,
            name: format!("macd_{fast_period}_{slow_period}_{signal_period}"),
            history: HashMap::new(),
        }
    }
}

fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    for &v in values {
        let next = match out.last() {
            Some(&prev) => alpha * v + (1.0 - alpha) * prev,
            None => v,
        };
        out.push(next);
    }
    out
}

impl Strategy for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_bar(&mut self, bar: &Bar) -> Option<Signal> {
        self.history
            .entry(bar.symbol.clone())
            .or_default()
            .push(bar.close);
        let prices = &self.history[&bar.symbol];

        if prices.len() < self.slow_period + self.signal_period + 1 {
            return None;
        }

        let ema_fast = ema(prices, self.fast_period);
        let ema_slow = ema(prices, self.slow_period);
        let macd: Vec<f64> = ema_fast
            .iter()
            .zip(&ema_slow)
            .map(|(f, s)| f - s)
            .collect();
        let signal_line = ema(&macd, self.signal_period);

        let n = macd.len();
        let (prev_macd, curr_macd) = (macd[n - 2], macd[n - 1]);
        let (prev_signal, curr_signal) = (signal_line[n - 2], signal_line[n - 1]);

        if prev_macd <= prev_signal && curr_macd > curr_signal {
            Some(Signal::new(
                &bar.symbol,
                SignalKind::Buy,
                bar.timestamp,
                bar.close,
                "MACD crossed above signal line",
            ))
        } else if prev_macd >= prev_signal && curr_macd < curr_signal {
            Some(Signal::new(
                &bar.symbol,
                SignalKind::Sell,
                bar.timestamp,
                bar.close,
                "MACD crossed below signal line",
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn ema_seeds_with_first_value() {
        let out = ema(&[10.0, 10.0, 10.0], 3);
        assert_eq!(out, vec![10.0, 10.0, 10.0]);

        // alpha = 0.5 for span 3
        let out = ema(&[10.0, 20.0], 3);
        assert_eq!(out, vec![10.0, 15.0]);
    }

    fn feed(strategy: &mut Macd, closes: &[f64]) -> Vec<Option<SignalKind>> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let bar = Bar {
                    symbol: "SPY".into(),
                    timestamp: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1_000.0,
                };
                strategy.on_bar(&bar).map(|s| s.kind)
            })
            .collect()
    }

    #[test]
    fn no_signal_before_warmup() {
        let mut strategy = Macd::new(3, 6, 3);
        // Warmup is slow + signal + 1 = 10 bars.
        let closes: Vec<f64> = (0..9).map(|i| 100.0 + i as f64).collect();
        let out = feed(&mut strategy, &closes);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn downturn_after_rally_fires_sell() {
        let mut strategy = Macd::new(3, 6, 3);
        let mut closes: Vec<f64> = (0..12).map(|i| 100.0 + 2.0 * i as f64).collect();
        closes.extend([118.0, 112.0, 106.0, 100.0]);
        let out = feed(&mut strategy, &closes);
        assert!(out.contains(&Some(SignalKind::Sell)));
        let first_sell = out.iter().position(|s| *s == Some(SignalKind::Sell));
        let first_buy = out.iter().position(|s| *s == Some(SignalKind::Buy));
        if let (Some(sell), Some(buy)) = (first_sell, first_buy) {
            assert!(sell < buy);
        }
    }

    #[test]
    fn rally_after_decline_fires_buy() {
        let mut strategy = Macd::new(3, 6, 3);
        let mut closes: Vec<f64> = (0..12).map(|i| 150.0 - 2.0 * i as f64).collect();
        closes.extend([130.0, 136.0, 142.0, 148.0]);
        let out = feed(&mut strategy, &closes);
        assert!(out.contains(&Some(SignalKind::Buy)));
    }
}
