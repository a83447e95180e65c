//! Serializable run configuration, loaded from TOML.

use quantlab_core::engine::EngineConfig;
use quantlab_core::risk::RiskLimits;
use quantlab_core::strategy::StrategyConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to reproduce a run.
///
/// Two identical configs hash to the same [`RunId`], so artifacts from
/// repeated runs of the same setup land in the same place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub backtest: BacktestSection,
    #[serde(default)]
    pub risk: RiskLimits,
    pub strategy: StrategyConfig,
}

/// Execution parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    #[serde(default)]
    pub commission: f64,
    #[serde(default = "default_slippage")]
    pub slippage: f64,
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

fn default_initial_capital() -> f64 {
    100_000.0
}
fn default_slippage() -> f64 {
    0.001
}
fn default_risk_free_rate() -> f64 {
    0.02
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            initial_capital: default_initial_capital(),
            commission: 0.0,
            slippage: default_slippage(),
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

impl RunConfig {
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.backtest.initial_capital <= 0.0 {
            return Err(ConfigError::Invalid(
                "initial_capital must be positive".into(),
            ));
        }
        if self.backtest.slippage < 0.0 || self.backtest.commission < 0.0 {
            return Err(ConfigError::Invalid(
                "slippage and commission must be non-negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.risk.max_drawdown) {
            return Err(ConfigError::Invalid(
                "max_drawdown must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// Deterministic content hash of this configuration.
    pub fn run_id(&self) -> RunId {
        // PartialEq-equal configs always serialize identically.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            initial_capital: self.backtest.initial_capital,
            commission: self.backtest.commission,
            slippage: self.backtest.slippage,
            limits: self.risk,
        }
    }
}
