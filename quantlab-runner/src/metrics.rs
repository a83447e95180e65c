//! Performance metrics: pure functions over the equity curve and trades.
//!
//! Every metric is a pure function: equity curve and/or trade list in,
//! scalar out. Degenerate inputs (empty curves, zero variance, no
//! losing trades) yield 0.0 rather than NaN or infinity.

use quantlab_core::domain::{EquityPoint, Trade};

pub const PERIODS_PER_YEAR: f64 = 252.0;

/// Simple percentage-change returns between consecutive equity points.
pub fn returns_from_curve(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .filter(|w| w[0].value != 0.0)
        .map(|w| (w[1].value - w[0].value) / w[0].value)
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Annualized Sharpe ratio from per-period returns.
///
/// `sqrt(252) * mean(returns - rf/252) / std(returns)`, 0.0 when the
/// return series is too short or has no variance.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let std = std_dev(returns);
    if std == 0.0 {
        return 0.0;
    }
    let daily_rf = risk_free_rate / PERIODS_PER_YEAR;
    let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
    PERIODS_PER_YEAR.sqrt() * mean(&excess) / std
}

/// Annualized Sortino ratio.
///
/// Same numerator as Sharpe but the denominator is the standard
/// deviation of the negative returns only.
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let downside_std = std_dev(&downside);
    if downside_std == 0.0 {
        return 0.0;
    }
    let daily_rf = risk_free_rate / PERIODS_PER_YEAR;
    let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
    PERIODS_PER_YEAR.sqrt() * mean(&excess) / downside_std
}

/// Deepest peak-to-trough decline and the longest run of points at or
/// below a prior peak.
///
/// The duration counter increments on every point that fails to set a
/// new strict peak (the first point included) and resets when one does.
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> (f64, usize) {
    if equity_curve.is_empty() {
        return (0.0, 0);
    }
    let mut peak = equity_curve[0].value;
    let mut max_dd = 0.0;
    let mut max_duration = 0usize;
    let mut current_duration = 0usize;

    for point in equity_curve {
        if point.value > peak {
            peak = point.value;
            current_duration = 0;
        } else {
            let dd = if peak != 0.0 {
                (peak - point.value) / peak
            } else {
                0.0
            };
            if dd > max_dd {
                max_dd = dd;
            }
            current_duration += 1;
            max_duration = max_duration.max(current_duration);
        }
    }
    (max_dd, max_duration)
}

/// Annualized return over maximum drawdown. Zero when either the
/// drawdown or the span is zero.
pub fn calmar_ratio(total_return: f64, max_drawdown: f64, years: f64) -> f64 {
    if max_drawdown == 0.0 || years == 0.0 {
        return 0.0;
    }
    let annual_return = (1.0 + total_return).powf(1.0 / years) - 1.0;
    annual_return / max_drawdown
}

/// Value at Risk at the given confidence, as the `(1 - confidence)`
/// percentile of returns with linear interpolation between order
/// statistics.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = (sorted.len() - 1) as f64 * (1.0 - confidence);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = rank - lo as f64;
    sorted[lo] * (1.0 - weight) + sorted[hi] * weight
}

/// Mean of the returns at or below the VaR threshold.
pub fn conditional_value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let var = value_at_risk(returns, confidence);
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var).collect();
    mean(&tail)
}

/// Fraction of trades with positive realized P&L, over all trades.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().filter(|t| t.is_winner()).count() as f64 / trades.len() as f64
}

/// Mean realized P&L of winning trades, 0.0 with no winners.
pub fn avg_win(trades: &[Trade]) -> f64 {
    let wins: Vec<f64> = trades
        .iter()
        .filter(|t| t.is_winner())
        .map(|t| t.realized_pnl)
        .collect();
    mean(&wins)
}

/// Mean realized P&L of losing trades (negative), 0.0 with no losers.
pub fn avg_loss(trades: &[Trade]) -> f64 {
    let losses: Vec<f64> = trades
        .iter()
        .filter(|t| t.is_loser())
        .map(|t| t.realized_pnl)
        .collect();
    mean(&losses)
}

/// Gross wins over gross losses, 0.0 when there are no losing trades.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let gross_win: f64 = trades
        .iter()
        .filter(|t| t.is_winner())
        .map(|t| t.realized_pnl)
        .sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.is_loser())
        .map(|t| t.realized_pnl)
        .sum();
    if gross_loss == 0.0 {
        return 0.0;
    }
    gross_win.abs() / gross_loss.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quantlab_core::domain::Side;

    fn curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| EquityPoint {
                timestamp: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                value,
                cash: value,
                positions_value: 0.0,
            })
            .collect()
    }

    fn sell(pnl: f64) -> Trade {
        Trade {
            symbol: "SPY".into(),
            side: Side::Sell,
            quantity: 100.0,
            price: 50.0,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            commission: 0.0,
            realized_pnl: pnl,
        }
    }

    #[test]
    fn returns_are_pct_changes() {
        let returns = returns_from_curve(&curve(&[100.0, 110.0, 99.0]));
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.10).abs() < 1e-12);
        assert!((returns[1] + 0.10).abs() < 1e-12);
    }

    #[test]
    fn sharpe_is_zero_on_flat_curve() {
        let returns = returns_from_curve(&curve(&[100.0, 100.0, 100.0]));
        assert_eq!(sharpe_ratio(&returns, 0.02), 0.0);
    }

    #[test]
    fn sharpe_matches_hand_calc() {
        let returns = [0.01, -0.005, 0.02, 0.0];
        // mean 0.00625, sample std computed below
        let m = 0.00625;
        let var = [0.01, -0.005, 0.02, 0.0]
            .iter()
            .map(|r| (r - m) * (r - m))
            .sum::<f64>()
            / 3.0;
        let expected = 252.0_f64.sqrt() * m / var.sqrt();
        assert!((sharpe_ratio(&returns, 0.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn sortino_uses_only_downside_deviation() {
        let returns = [0.02, -0.01, 0.03, -0.03, 0.01];
        let sortino = sortino_ratio(&returns, 0.0);
        let sharpe = sharpe_ratio(&returns, 0.0);
        assert!(sortino != 0.0);
        // Downside std (from just two losses) differs from full std.
        assert!((sortino - sharpe).abs() > 1e-9);
    }

    #[test]
    fn sortino_zero_without_two_down_days() {
        assert_eq!(sortino_ratio(&[0.01, 0.02, -0.01], 0.0), 0.0);
        assert_eq!(sortino_ratio(&[0.01, 0.02], 0.0), 0.0);
    }

    #[test]
    fn max_drawdown_finds_deepest_valley() {
        let (dd, _) = max_drawdown(&curve(&[100.0, 120.0, 90.0, 110.0, 80.0, 130.0]));
        // Deepest: 120 -> 80.
        assert!((dd - (120.0 - 80.0) / 120.0).abs() < 1e-12);
    }

    #[test]
    fn drawdown_duration_counts_bars_under_the_peak() {
        // Peak at 120 (index 1), under water for indices 2..=4.
        let (_, duration) = max_drawdown(&curve(&[100.0, 120.0, 90.0, 110.0, 115.0, 130.0]));
        assert_eq!(duration, 3);
    }

    #[test]
    fn monotone_curve_has_duration_one() {
        // The first point never exceeds the seeded peak, so it counts.
        let (dd, duration) = max_drawdown(&curve(&[100.0, 110.0, 120.0]));
        assert_eq!(dd, 0.0);
        assert_eq!(duration, 1);
    }

    #[test]
    fn empty_curve_yields_zeroes() {
        assert_eq!(max_drawdown(&[]), (0.0, 0));
        assert!(returns_from_curve(&[]).is_empty());
    }

    #[test]
    fn calmar_annualizes_before_dividing() {
        // 21% over two years, 10% drawdown: (1.21)^(1/2)-1 = 0.1.
        let calmar = calmar_ratio(0.21, 0.10, 2.0);
        assert!((calmar - 1.0).abs() < 1e-9);
        assert_eq!(calmar_ratio(0.21, 0.0, 2.0), 0.0);
        assert_eq!(calmar_ratio(0.21, 0.10, 0.0), 0.0);
    }

    #[test]
    fn var_interpolates_between_order_statistics() {
        // 5 returns, rank = 4 * 0.05 = 0.2: between the two worst.
        let returns = [-0.05, -0.01, 0.0, 0.01, 0.02];
        let var = value_at_risk(&returns, 0.95);
        let expected = -0.05 * 0.8 + -0.01 * 0.2;
        assert!((var - expected).abs() < 1e-12);
    }

    #[test]
    fn cvar_averages_the_tail() {
        let returns = [-0.05, -0.01, 0.0, 0.01, 0.02];
        let cvar = conditional_value_at_risk(&returns, 0.95);
        // Only the worst return sits at or below the interpolated VaR.
        assert!((cvar - (-0.05)).abs() < 1e-12);
    }

    #[test]
    fn trade_stats_partition_by_pnl_sign() {
        let trades = vec![sell(100.0), sell(-50.0), sell(200.0), sell(0.0)];
        assert!((win_rate(&trades) - 0.5).abs() < 1e-12);
        assert!((avg_win(&trades) - 150.0).abs() < 1e-12);
        assert!((avg_loss(&trades) + 50.0).abs() < 1e-12);
        assert!((profit_factor(&trades) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn profit_factor_zero_without_losers() {
        assert_eq!(profit_factor(&[sell(100.0)]), 0.0);
        assert_eq!(win_rate(&[]), 0.0);
        assert_eq!(avg_win(&[]), 0.0);
        assert_eq!(avg_loss(&[]), 0.0);
    }
}
