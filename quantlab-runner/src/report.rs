//! Aggregate performance report for one run.

use crate::metrics;
use quantlab_core::domain::{EquityPoint, Trade};
use serde::{Deserialize, Serialize};

/// Every headline statistic for a completed run.
///
/// Percent fields are their fractional twins scaled by 100; both are
/// kept so exported artifacts read naturally without post-processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub total_return: f64,
    pub total_return_pct: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub max_drawdown_duration: usize,
    pub calmar_ratio: f64,
    pub value_at_risk_95: f64,
    pub cvar_95: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub trading_days: usize,
    pub years: f64,
    pub final_portfolio_value: f64,
}

impl BacktestReport {
    /// Compute the full report. An empty equity curve yields an
    /// all-zero report with `final_portfolio_value` equal to the initial capital.
    pub fn compute(
        equity_curve: &[EquityPoint],
        trades: &[Trade],
        initial_capital: f64,
        risk_free_rate: f64,
    ) -> Self {
        let final_portfolio_value = equity_curve
            .last()
            .map(|p| p.value)
            .unwrap_or(initial_capital);
        let total_return = if initial_capital != 0.0 {
            (final_portfolio_value - initial_capital) / initial_capital
        } else {
            0.0
        };

        let returns = metrics::returns_from_curve(equity_curve);
        let (max_dd, max_dd_duration) = metrics::max_drawdown(equity_curve);
        let trading_days = equity_curve.len();
        let years = trading_days as f64 / metrics::PERIODS_PER_YEAR;

        let winning_trades = trades.iter().filter(|t| t.is_winner()).count();
        let losing_trades = trades.iter().filter(|t| t.is_loser()).count();

        Self {
            total_return,
            total_return_pct: total_return * 100.0,
            sharpe_ratio: metrics::sharpe_ratio(&returns, risk_free_rate),
            sortino_ratio: metrics::sortino_ratio(&returns, risk_free_rate),
            max_drawdown: max_dd,
            max_drawdown_pct: max_dd * 100.0,
            max_drawdown_duration: max_dd_duration,
            calmar_ratio: metrics::calmar_ratio(total_return, max_dd, years),
            value_at_risk_95: metrics::value_at_risk(&returns, 0.95),
            cvar_95: metrics::conditional_value_at_risk(&returns, 0.95),
            total_trades: trades.len(),
            winning_trades,
            losing_trades,
            win_rate: metrics::win_rate(trades),
            avg_win: metrics::avg_win(trades),
            avg_loss: metrics::avg_loss(trades),
            profit_factor: metrics::profit_factor(trades),
            trading_days,
            years,
            final_portfolio_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quantlab_core::domain::Side;

    fn point(offset: i64, value: f64) -> EquityPoint {
        EquityPoint {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(offset),
            value,
            cash: value,
            positions_value: 0.0,
        }
    }

    #[test]
    fn empty_run_produces_all_zero_report() {
        let report = BacktestReport::compute(&[], &[], 100_000.0, 0.02);
        assert_eq!(report.total_return, 0.0);
        assert_eq!(report.sharpe_ratio, 0.0);
        assert_eq!(report.max_drawdown_duration, 0);
        assert_eq!(report.total_trades, 0);
        assert_eq!(report.final_portfolio_value, 100_000.0);
        assert_eq!(report.trading_days, 0);
    }

    #[test]
    fn total_return_and_years_from_curve() {
        let curve: Vec<EquityPoint> = (0..252)
            .map(|i| point(i, 100_000.0 + 40.0 * i as f64))
            .collect();
        let report = BacktestReport::compute(&curve, &[], 100_000.0, 0.02);
        assert!((report.years - 1.0).abs() < 1e-12);
        let expected = (curve.last().unwrap().value - 100_000.0) / 100_000.0;
        assert!((report.total_return - expected).abs() < 1e-12);
        assert!((report.total_return_pct - expected * 100.0).abs() < 1e-9);
    }

    #[test]
    fn trade_counters_match_partition() {
        let sell = |pnl: f64| Trade {
            symbol: "SPY".into(),
            side: Side::Sell,
            quantity: 1.0,
            price: 1.0,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            commission: 0.0,
            realized_pnl: pnl,
        };
        let trades = vec![sell(10.0), sell(-5.0), sell(0.0)];
        let curve = vec![point(0, 100_000.0), point(1, 100_005.0)];
        let report = BacktestReport::compute(&curve, &trades, 100_000.0, 0.02);
        assert_eq!(report.total_trades, 3);
        assert_eq!(report.winning_trades, 1);
        assert_eq!(report.losing_trades, 1);
        assert!((report.win_rate - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn report_serializes_with_stable_field_names() {
        let report = BacktestReport::compute(&[], &[], 1_000.0, 0.02);
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "total_return",
            "sharpe_ratio",
            "sortino_ratio",
            "max_drawdown_duration",
            "calmar_ratio",
            "value_at_risk_95",
            "cvar_95",
            "profit_factor",
        ] {
            assert!(json.get(key).is_some(), "missing field {key}");
        }
    }
}
