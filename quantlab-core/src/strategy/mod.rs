//! Strategy trait and the built-in signal generators.
//!
//! A strategy consumes bars one at a time and may emit at most one signal
//! per bar. Strategies keep their own per-symbol history and never see
//! the ledger; admission and sizing belong to the risk gate.

pub mod bollinger;
pub mod macd;
pub mod rsi;
pub mod sma_crossover;

pub use bollinger::BollingerBands;
pub use macd::Macd;
pub use rsi::Rsi;
pub use sma_crossover::SmaCrossover;

use crate::domain::{Bar, Signal};
use serde::{Deserialize, Serialize};

/// A signal generator fed bars in chronological order per instrument.
pub trait Strategy: Send {
    fn name(&self) -> &str;

    /// Observe one bar, returning a signal when one fires. Bars arrive
    /// in chronological order within each symbol; symbols interleave.
    fn on_bar(&mut self, bar: &Bar) -> Option<Signal>;
}

fn default_short_window() -> usize {
    20
}
fn default_long_window() -> usize {
    50
}
fn default_rsi_period() -> usize {
    14
}
fn default_oversold() -> f64 {
    30.0
}
fn default_overbought() -> f64 {
    70.0
}
fn default_bb_period() -> usize {
    20
}
fn default_num_std() -> f64 {
    2.0
}
fn default_fast_period() -> usize {
    12
}
fn default_slow_period() -> usize {
    26
}
fn default_signal_period() -> usize {
    9
}

/// Declarative strategy selection, deserialized from run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyConfig {
    SmaCrossover {
        #[serde(default = "default_short_window")]
        short_window: usize,
        #[serde(default = "default_long_window")]
        long_window: usize,
    },
    Rsi {
        #[serde(default = "default_rsi_period")]
        period: usize,
        #[serde(default = "default_oversold")]
        oversold: f64,
        #[serde(default = "default_overbought")]
        overbought: f64,
    },
    BollingerBands {
        #[serde(default = "default_bb_period")]
        period: usize,
        #[serde(default = "default_num_std")]
        num_std: f64,
    },
    Macd {
        #[serde(default = "default_fast_period")]
        fast_period: usize,
        #[serde(default = "default_slow_period")]
        slow_period: usize,
        #[serde(default = "default_signal_period")]
        signal_period: usize,
    },
}

impl StrategyConfig {
    /// Instantiate the configured strategy.
    pub fn build(&self) -> Box<dyn Strategy> {
        match *self {
            StrategyConfig::SmaCrossover {
                short_window,
                long_window,
            } => Box::new(SmaCrossover::new(short_window, long_window)),
            StrategyConfig::Rsi {
                period,
                oversold,
                overbought,
            } => Box::new(Rsi::new(period, oversold, overbought)),
            StrategyConfig::BollingerBands { period, num_std } => {
                Box::new(BollingerBands::new(period, num_std))
            }
            StrategyConfig::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => Box::new(Macd::new(fast_period, slow_period, signal_period)),
        }
    }
}
