//! QuantLab Runner: run orchestration, metrics, and artifacts.
//!
//! This crate builds on `quantlab-core` to provide:
//! - TOML run configuration with content-addressed run IDs
//! - CSV bar loading and a seeded synthetic data generator
//! - Single-backtest runner producing a serializable result
//! - Performance report (Sharpe, Sortino, Calmar, VaR, trade stats)
//! - JSON/CSV artifact export

pub mod config;
pub mod data;
pub mod export;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod sample_data;

pub use config::{ConfigError, RunConfig, RunId};
pub use data::{load_bars_csv, DataError};
pub use export::{export_json, import_json, save_artifacts};
pub use report::BacktestReport;
pub use runner::{run_backtest, BacktestResult, RunError, SCHEMA_VERSION};
pub use sample_data::random_walk;
