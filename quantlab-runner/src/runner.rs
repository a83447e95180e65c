//! Run orchestration: config + data in, serializable result out.

use crate::config::{RunConfig, RunId};
use crate::report::BacktestReport;
use quantlab_core::domain::{Bar, EquityPoint, Symbol, Trade};
use quantlab_core::engine::{Engine, EngineError, RunState};
use quantlab_core::events::RunLog;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version stamp embedded in every persisted result. Bump when the
/// serialized shape changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("no market data supplied")]
    EmptyData,
}

/// Full serializable output of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub schema_version: u32,
    pub run_id: RunId,
    pub strategy_name: String,
    pub state: RunState,
    pub report: BacktestReport,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub events: RunLog,
}

/// Execute one backtest from config and pre-loaded bars.
///
/// Instruments trade in the order given; the engine's union clock
/// interleaves their calendars.
pub fn run_backtest(
    config: &RunConfig,
    data: Vec<(Symbol, Vec<Bar>)>,
) -> Result<BacktestResult, RunError> {
    if data.is_empty() {
        return Err(RunError::EmptyData);
    }

    let mut engine = Engine::new(config.engine_config());
    for (symbol, bars) in data {
        engine.load_data(symbol, bars);
    }

    let mut strategy = config.strategy.build();
    let outcome = engine.run(strategy.as_mut())?;

    let report = BacktestReport::compute(
        outcome.ledger.equity_curve(),
        outcome.ledger.trades(),
        config.backtest.initial_capital,
        config.backtest.risk_free_rate,
    );

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        strategy_name: strategy.name().to_string(),
        state: outcome.state,
        report,
        equity_curve: outcome.ledger.equity_curve().to_vec(),
        trades: outcome.ledger.trades().to_vec(),
        events: outcome.log,
    })
}
