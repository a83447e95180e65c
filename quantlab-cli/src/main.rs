//! QuantLab CLI: run backtests from TOML configs.
//!
//! Commands:
//! - `run`: execute a backtest from a TOML config over CSV or synthetic
//!   data and save JSON/CSV artifacts

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use quantlab_runner::config::RunConfig;
use quantlab_runner::runner::{run_backtest, BacktestResult};
use quantlab_runner::sample_data::random_walk;
use quantlab_runner::{load_bars_csv, save_artifacts};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quantlab", about = "QuantLab CLI: event-driven backtesting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// CSV file of bars (symbol,timestamp,open,high,low,close,volume).
        #[arg(long)]
        data: Option<PathBuf>,

        /// Run on seeded synthetic data instead of a CSV: number of days.
        #[arg(long)]
        synthetic: Option<usize>,

        /// Symbols for synthetic data.
        #[arg(long, default_values_t = [String::from("SPY")])]
        symbols: Vec<String>,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            synthetic,
            symbols,
            output_dir,
        } => run_cmd(config, data, synthetic, symbols, output_dir),
    }
}

fn run_cmd(
    config_path: PathBuf,
    data_path: Option<PathBuf>,
    synthetic: Option<usize>,
    symbols: Vec<String>,
    output_dir: PathBuf,
) -> Result<()> {
    if data_path.is_some() && synthetic.is_some() {
        bail!("--data and --synthetic are mutually exclusive");
    }

    let config = RunConfig::load(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    let data = if let Some(path) = data_path {
        load_bars_csv(&path).with_context(|| format!("loading bars {}", path.display()))?
    } else if let Some(days) = synthetic {
        symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| {
                let bars = random_walk(symbol, days, 100.0, 42 + i as u64);
                (symbol.clone(), bars)
            })
            .collect()
    } else {
        bail!("one of --data or --synthetic is required");
    };

    let result = run_backtest(&config, data)?;

    print_summary(&result);

    let paths = save_artifacts(&result, &output_dir)?;
    println!();
    for path in paths {
        println!("Saved {}", path.display());
    }

    Ok(())
}

fn print_summary(result: &BacktestResult) {
    let report = &result.report;
    println!();
    println!("=== Backtest Result ===");
    println!("Strategy:       {}", result.strategy_name);
    println!("Run ID:         {}", &result.run_id[..12]);
    println!("State:          {:?}", result.state);
    println!("Trading Days:   {}", report.trading_days);
    println!("Final Value:    ${:.2}", report.final_portfolio_value);
    println!();
    println!("--- Performance ---");
    println!("Total Return:   {:.2}%", report.total_return_pct);
    println!("Sharpe:         {:.3}", report.sharpe_ratio);
    println!("Sortino:        {:.3}", report.sortino_ratio);
    println!("Calmar:         {:.3}", report.calmar_ratio);
    println!("Max Drawdown:   {:.2}%", report.max_drawdown_pct);
    println!(
        "DD Duration:    {} days",
        report.max_drawdown_duration
    );
    println!();
    println!("--- Trades ---");
    println!("Total:          {}", report.total_trades);
    println!("Winners:        {}", report.winning_trades);
    println!("Losers:         {}", report.losing_trades);
    println!("Win Rate:       {:.1}%", report.win_rate * 100.0);
    println!("Avg Win:        ${:.2}", report.avg_win);
    println!("Avg Loss:       ${:.2}", report.avg_loss);
    println!("Profit Factor:  {:.2}", report.profit_factor);
    println!();
    println!("--- Risk ---");
    println!("VaR (95%):      {:.4}", report.value_at_risk_95);
    println!("CVaR (95%):     {:.4}", report.cvar_95);

    if let Some(halt) = result.events.halt() {
        println!();
        println!("WARNING: run halted early: {halt:?}");
    }
}
