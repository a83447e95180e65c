//! Per-run event log: fills, rejections, and halts.
//!
//! Each engine run owns one `RunLog`; nothing is shared across runs and
//! there is no global logger state. Events are appended in simulation
//! order and serialized with run artifacts.

use crate::domain::Side;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One notable occurrence during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    /// A signal passed admission and was applied to the ledger.
    Fill {
        timestamp: NaiveDate,
        symbol: String,
        side: Side,
        quantity: f64,
        price: f64,
        commission: f64,
    },
    /// A signal was refused by the risk gate.
    Rejection {
        timestamp: NaiveDate,
        symbol: String,
        side: Side,
        quantity: f64,
        reason: String,
    },
    /// The run stopped early on a risk breach.
    Halt { timestamp: NaiveDate, reason: String },
}

/// Append-only event log for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunLog {
    events: Vec<RunEvent>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: RunEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[RunEvent] {
        &self.events
    }

    pub fn fills(&self) -> impl Iterator<Item = &RunEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, RunEvent::Fill { .. }))
    }

    pub fn rejections(&self) -> impl Iterator<Item = &RunEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, RunEvent::Rejection { .. }))
    }

    pub fn halt(&self) -> Option<&RunEvent> {
        self.events
            .iter()
            .find(|e| matches!(e, RunEvent::Halt { .. }))
    }
}
