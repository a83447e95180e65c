//! QuantLab Core: simulation engine, ledger, risk gate, and strategies.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, signals, positions, trades, equity points)
//! - Weighted-average-cost ledger with append-only trade log
//! - Risk gate for position sizing, admission, and halt decisions
//! - Sorted-union event loop over multiple instrument series
//! - Strategy trait plus the four built-in signal generators

pub mod domain;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod risk;
pub mod strategy;
