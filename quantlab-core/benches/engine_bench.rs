//! Criterion benchmarks for hot paths.
//!
//! Benchmarks:
//! 1. Full engine run (SMA crossover over a synthetic series)
//! 2. Ledger revaluation
//! 3. Strategy on_bar throughput (MACD is the heaviest)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;

use quantlab_core::domain::{Bar, Symbol};
use quantlab_core::engine::{Engine, EngineConfig};
use quantlab_core::ledger::Ledger;
use quantlab_core::strategy::{Macd, SmaCrossover, Strategy};

fn make_bars(symbol: &str, n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar {
                symbol: symbol.to_string(),
                timestamp: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0,
            }
        })
        .collect()
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_run");
    for n in [252usize, 1_260] {
        group.bench_with_input(BenchmarkId::new("sma_crossover", n), &n, |b, &n| {
            b.iter(|| {
                let mut engine = Engine::new(EngineConfig::default());
                engine.load_data("SPY", make_bars("SPY", n));
                engine.load_data("QQQ", make_bars("QQQ", n));
                let mut strategy = SmaCrossover::new(10, 50);
                black_box(engine.run(&mut strategy).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_revalue(c: &mut Criterion) {
    c.bench_function("ledger_revalue_10_positions", |b| {
        let mut ledger = Ledger::new(1_000_000.0);
        let date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let mut prices: HashMap<Symbol, f64> = HashMap::new();
        for i in 0..10 {
            let symbol = format!("SYM{i}");
            ledger.apply_fill(
                &symbol,
                100.0,
                50.0,
                quantlab_core::domain::Side::Buy,
                0.0,
                date,
            );
            prices.insert(symbol, 52.5);
        }
        b.iter(|| {
            ledger.revalue(date, black_box(&prices));
        })
    });
}

fn bench_strategy_on_bar(c: &mut Criterion) {
    c.bench_function("macd_on_bar_252_history", |b| {
        let bars = make_bars("SPY", 253);
        let mut warmed = Macd::new(12, 26, 9);
        for bar in &bars[..252] {
            warmed.on_bar(bar);
        }
        // Clone per iteration so history does not grow across iters.
        b.iter(|| {
            let mut strategy = warmed.clone();
            black_box(strategy.on_bar(&bars[252]))
        })
    });
}

criterion_group!(benches, bench_full_run, bench_revalue, bench_strategy_on_bar);
criterion_main!(benches);
