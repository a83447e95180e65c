//! Artifact export: JSON result plus CSV trade tape and equity curve.
//!
//! `save_artifacts` writes three files into the output directory:
//! `report.json` (the full [`BacktestResult`]), `trades.csv`, and
//! `equity.csv`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use quantlab_core::domain::{EquityPoint, Side, Trade};

use crate::runner::{BacktestResult, SCHEMA_VERSION};

/// Serialize a result to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a result from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

/// Trade tape as CSV.
///
/// Columns: symbol, side, quantity, price, timestamp, commission,
/// realized_pnl.
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "symbol",
        "side",
        "quantity",
        "price",
        "timestamp",
        "commission",
        "realized_pnl",
    ])?;
    for trade in trades {
        let side = match trade.side {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        };
        wtr.write_record([
            trade.symbol.clone(),
            side.to_string(),
            trade.quantity.to_string(),
            trade.price.to_string(),
            trade.timestamp.to_string(),
            trade.commission.to_string(),
            trade.realized_pnl.to_string(),
        ])?;
    }
    let bytes = wtr.into_inner().context("CSV writer flush failed")?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

/// Equity curve as CSV with columns timestamp, value, cash,
/// positions_value.
pub fn export_equity_csv(equity_curve: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "value", "cash", "positions_value"])?;
    for point in equity_curve {
        wtr.write_record([
            point.timestamp.to_string(),
            point.value.to_string(),
            point.cash.to_string(),
            point.positions_value.to_string(),
        ])?;
    }
    let bytes = wtr.into_inner().context("CSV writer flush failed")?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

/// Write all artifacts for a run, returning the paths written.
pub fn save_artifacts(result: &BacktestResult, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;

    let report_path = dir.join("report.json");
    std::fs::write(&report_path, export_json(result)?)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    let trades_path = dir.join("trades.csv");
    std::fs::write(&trades_path, export_trades_csv(&result.trades)?)
        .with_context(|| format!("failed to write {}", trades_path.display()))?;

    let equity_path = dir.join("equity.csv");
    std::fs::write(&equity_path, export_equity_csv(&result.equity_curve)?)
        .with_context(|| format!("failed to write {}", equity_path.display()))?;

    Ok(vec![report_path, trades_path, equity_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trade() -> Trade {
        Trade {
            symbol: "SPY".into(),
            side: Side::Sell,
            quantity: 100.0,
            price: 52.5,
            timestamp: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            commission: 1.0,
            realized_pnl: 249.0,
        }
    }

    #[test]
    fn trades_csv_has_header_and_rows() {
        let csv = export_trades_csv(&[trade()]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "symbol,side,quantity,price,timestamp,commission,realized_pnl"
        );
        assert_eq!(lines.next().unwrap(), "SPY,SELL,100,52.5,2024-02-01,1,249");
    }

    #[test]
    fn equity_csv_round_trips_values() {
        let point = EquityPoint {
            timestamp: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            value: 100_500.0,
            cash: 95_000.0,
            positions_value: 5_500.0,
        };
        let csv = export_equity_csv(&[point]).unwrap();
        assert!(csv.contains("2024-02-01,100500,95000,5500"));
    }

    #[test]
    fn import_rejects_newer_schema() {
        let json = serde_json::json!({
            "schema_version": SCHEMA_VERSION + 1,
            "run_id": "x",
            "strategy_name": "s",
            "state": "COMPLETED",
            "report": crate::report::BacktestReport::compute(&[], &[], 1.0, 0.0),
            "equity_curve": [],
            "trades": [],
            "events": { "events": [] },
        });
        let raw = serde_json::to_string(&json).unwrap();
        assert!(import_json(&raw).is_err());
    }
}
