#![allow(dead_code)]

use serde::de::DeserializeOwned;
use supertrend_signal::Bar;

const OHLCV_PATH: &str = "tests/fixtures/data/nifty-1d.csv";

/// Load the daily reference bars.
pub fn load_reference_bars() -> Vec<Bar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

fn load_records<T: DeserializeOwned>(path: &str, context: &str) -> Vec<T> {
    let mut reader = csv::Reader::from_path(path)
        .unwrap_or_else(|e| panic!("failed to open {path}: {e}"));
    reader
        .deserialize()
        .map(|record| record.unwrap_or_else(|e| panic!("{context} in {path}: {e}")))
        .collect()
}
