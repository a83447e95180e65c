//! CSV bar loading.
//!
//! Expected columns: `symbol,timestamp,open,high,low,close,volume` with
//! ISO dates. Rows may mix symbols; the loader groups them, sorts each
//! group chronologically, and preserves the order symbols first appear
//! in the file.

use chrono::NaiveDate;
use quantlab_core::domain::{Bar, Symbol};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("insane bar for {symbol} at {timestamp}")]
    InsaneBar { symbol: String, timestamp: NaiveDate },
}

#[derive(Debug, Deserialize)]
struct BarRow {
    symbol: String,
    timestamp: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<BarRow> for Bar {
    fn from(row: BarRow) -> Self {
        Bar {
            symbol: row.symbol,
            timestamp: row.timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

/// Load and group bars from a CSV file.
pub fn load_bars_csv(path: &Path) -> Result<Vec<(Symbol, Vec<Bar>)>, DataError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut grouped: Vec<(Symbol, Vec<Bar>)> = Vec::new();

    for record in reader.deserialize() {
        let row: BarRow = record?;
        let bar: Bar = row.into();
        if !bar.is_sane() {
            return Err(DataError::InsaneBar {
                symbol: bar.symbol,
                timestamp: bar.timestamp,
            });
        }
        match grouped.iter_mut().find(|(s, _)| *s == bar.symbol) {
            Some((_, bars)) => bars.push(bar),
            None => grouped.push((bar.symbol.clone(), vec![bar])),
        }
    }

    for (_, bars) in &mut grouped {
        bars.sort_by_key(|b| b.timestamp);
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_grouped_and_sorted() {
        let file = write_csv(
            "symbol,timestamp,open,high,low,close,volume\n\
             SPY,2024-01-03,101.0,103.0,100.0,102.0,1000\n\
             QQQ,2024-01-02,300.0,305.0,299.0,304.0,2000\n\
             SPY,2024-01-02,100.0,102.0,99.0,101.0,1000\n",
        );
        let data = load_bars_csv(file.path()).unwrap();

        assert_eq!(data.len(), 2);
        // First-appearance order: SPY, then QQQ.
        assert_eq!(data[0].0, "SPY");
        assert_eq!(data[1].0, "QQQ");
        // SPY rows sorted chronologically.
        let spy = &data[0].1;
        assert_eq!(spy.len(), 2);
        assert!(spy[0].timestamp < spy[1].timestamp);
        assert_eq!(spy[0].close, 101.0);
    }

    #[test]
    fn insane_rows_are_rejected() {
        let file = write_csv(
            "symbol,timestamp,open,high,low,close,volume\n\
             SPY,2024-01-02,100.0,99.0,99.0,101.0,1000\n",
        );
        assert!(matches!(
            load_bars_csv(file.path()),
            Err(DataError::InsaneBar { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_style_error() {
        let err = load_bars_csv(Path::new("/nonexistent/bars.csv")).unwrap_err();
        assert!(matches!(err, DataError::Csv(_)));
    }
}
