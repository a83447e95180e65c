//! Synthetic market data for demos and tests.

use chrono::{Duration, NaiveDate};
use quantlab_core::domain::Bar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic geometric random walk of daily bars.
///
/// Same seed, same bars. Drift and volatility are tuned to look like a
/// liquid equity (~7% annual drift, ~16% annual vol).
pub fn random_walk(symbol: &str, days: usize, start_price: f64, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start_date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();

    let drift = 0.0003;
    let volatility = 0.01;

    let mut close = start_price;
    (0..days)
        .map(|i| {
            let noise: f64 = rng.gen_range(-1.0..1.0);
            let open = close;
            close *= 1.0 + drift + volatility * noise;
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.005));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.005));
            Bar {
                symbol: symbol.to_string(),
                timestamp: start_date + Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: rng.gen_range(500_000.0..5_000_000.0),
            }
        })
        .collect()
}
