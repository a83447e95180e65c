//! Event-driven simulation engine.
//!
//! The engine walks the sorted union of all loaded timestamps. At each
//! timestamp it first asks the risk gate whether the run must halt, then
//! visits instruments in registration order, feeds each instrument's bar
//! (when one exists) to the strategy, routes any resulting signal through
//! the gate, and finally revalues the ledger once. Instruments with no
//! bar at a timestamp are skipped, not interpolated.

use crate::domain::{Bar, Side, Signal, SignalKind, Symbol};
use crate::events::{RunEvent, RunLog};
use crate::ledger::Ledger;
use crate::risk::{RiskGate, RiskLimits};
use crate::strategy::Strategy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Lifecycle of one engine instance. An engine runs exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Idle,
    Running,
    Halted,
    Completed,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no data loaded")]
    NoData,
    #[error("engine has already run")]
    AlreadyRan,
}

/// Execution parameters for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Flat commission charged per fill.
    pub commission: f64,
    /// Fractional slippage applied against the fill: BUYs execute at
    /// `price * (1 + slippage)`, SELLs at `price * (1 - slippage)`.
    pub slippage: f64,
    pub limits: RiskLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            commission: 0.0,
            slippage: 0.001,
            limits: RiskLimits::default(),
        }
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: RunState,
    pub ledger: Ledger,
    pub log: RunLog,
}

/// Single-use backtest engine over one or more instrument series.
pub struct Engine {
    config: EngineConfig,
    series: Vec<(Symbol, BTreeMap<NaiveDate, Bar>)>,
    state: RunState,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            series: Vec::new(),
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register an instrument's bars. Instruments are visited in first
    /// registration order; loading the same symbol again replaces its
    /// bars without changing that order.
    pub fn load_data(&mut self, symbol: impl Into<Symbol>, bars: Vec<Bar>) {
        let symbol = symbol.into();
        let series: BTreeMap<NaiveDate, Bar> =
            bars.into_iter().map(|b| (b.timestamp, b)).collect();
        match self.series.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, existing)) => *existing = series,
            None => self.series.push((symbol, series)),
        }
    }

    /// Run the simulation to completion or halt.
    pub fn run(&mut self, strategy: &mut dyn Strategy) -> Result<RunOutcome, EngineError> {
        if self.state != RunState::Idle {
            return Err(EngineError::AlreadyRan);
        }
        if self.series.is_empty() || self.series.iter().all(|(_, bars)| bars.is_empty()) {
            return Err(EngineError::NoData);
        }
        self.state = RunState::Running;

        let clock: BTreeSet<NaiveDate> = self
            .series
            .iter()
            .flat_map(|(_, bars)| bars.keys().copied())
            .collect();

        let mut ledger = Ledger::new(self.config.initial_capital);
        let gate = RiskGate::new(self.config.limits);
        let mut log = RunLog::new();

        for &date in &clock {
            // Halt verdict reflects the previous timestamp's revaluation.
            if let Some(reason) = gate.should_halt(&ledger) {
                log.record(RunEvent::Halt {
                    timestamp: date,
                    reason,
                });
                self.state = RunState::Halted;
                break;
            }

            for idx in 0..self.series.len() {
                let Some(bar) = self.series[idx].1.get(&date).cloned() else {
                    continue;
                };
                if let Some(signal) = strategy.on_bar(&bar) {
                    self.route_signal(&signal, &gate, &mut ledger, &mut log);
                }
            }

            let prices = self
                .series
                .iter()
                .filter_map(|(symbol, bars)| bars.get(&date).map(|b| (symbol.clone(), b.close)))
                .collect();
            ledger.revalue(date, &prices);
        }

        if self.state == RunState::Running {
            self.state = RunState::Completed;
        }

        Ok(RunOutcome {
            state: self.state,
            ledger,
            log,
        })
    }

    fn route_signal(
        &self,
        signal: &Signal,
        gate: &RiskGate,
        ledger: &mut Ledger,
        log: &mut RunLog,
    ) {
        match signal.kind {
            SignalKind::Buy => {
                // No pyramiding: a BUY against an open position is dropped.
                if ledger.has_position(&signal.symbol) {
                    return;
                }
                let quantity = match signal.quantity {
                    Some(q) => q,
                    None => gate.size_position(ledger, signal.price),
                };
                if quantity <= 0.0 {
                    return;
                }
                let verdict = gate.admit(ledger, signal, quantity);
                if verdict.approved {
                    let fill_price = signal.price * (1.0 + self.config.slippage);
                    ledger.apply_fill(
                        &signal.symbol,
                        quantity,
                        fill_price,
                        Side::Buy,
                        self.config.commission,
                        signal.timestamp,
                    );
                    log.record(RunEvent::Fill {
                        timestamp: signal.timestamp,
                        symbol: signal.symbol.clone(),
                        side: Side::Buy,
                        quantity,
                        price: fill_price,
                        commission: self.config.commission,
                    });
                } else {
                    log.record(RunEvent::Rejection {
                        timestamp: signal.timestamp,
                        symbol: signal.symbol.clone(),
                        side: Side::Buy,
                        quantity,
                        reason: verdict.reason.unwrap_or_default(),
                    });
                }
            }
            SignalKind::Sell => {
                // Sells always flatten the whole position.
                let Some(position) = ledger.position(&signal.symbol) else {
                    return;
                };
                let quantity = position.quantity;
                let verdict = gate.admit(ledger, signal, quantity);
                if verdict.approved {
                    let fill_price = signal.price * (1.0 - self.config.slippage);
                    ledger.apply_fill(
                        &signal.symbol,
                        quantity,
                        fill_price,
                        Side::Sell,
                        self.config.commission,
                        signal.timestamp,
                    );
                    log.record(RunEvent::Fill {
                        timestamp: signal.timestamp,
                        symbol: signal.symbol.clone(),
                        side: Side::Sell,
                        quantity,
                        price: fill_price,
                        commission: self.config.commission,
                    });
                } else {
                    log.record(RunEvent::Rejection {
                        timestamp: signal.timestamp,
                        symbol: signal.symbol.clone(),
                        side: Side::Sell,
                        quantity,
                        reason: verdict.reason.unwrap_or_default(),
                    });
                }
            }
            SignalKind::Hold => {}
        }
    }
}
