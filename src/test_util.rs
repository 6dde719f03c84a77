// src/test_util.rs

use std::num::NonZero;

use crate::{Bar, Price};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).expect("non zero value")
}

/// Convenience: bar with OHLC all equal to `close`.
pub fn bar(close: Price, time: i64) -> Bar {
    Bar::new(time, close, close, close, close)
}

pub fn ohlc(open: Price, high: Price, low: Price, close: Price, time: i64) -> Bar {
    Bar::new(time, open, high, low, close)
}

/// `n` bars pinned at `price`.
pub fn flat(price: Price, n: usize) -> Vec<Bar> {
    (0..n).map(|i| bar(price, i64::try_from(i).unwrap())).collect()
}

/// Flat at 100 for 20 bars, then +2 per bar up to 120 over 10 bars.
pub fn flat_then_rising() -> Vec<Bar> {
    (0..30)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let price = if i < 20 { 100.0 } else { 100.0 + 2.0 * (i - 19) as f64 };
            bar(price, i)
        })
        .collect()
}

/// Mirror of [`flat_then_rising`]: rising 80 → 100, then dropping back.
pub fn rising_then_falling() -> Vec<Bar> {
    (0..30)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let price = if i < 20 {
                80.0 + i as f64
            } else {
                99.0 - 3.0 * (i - 19) as f64
            };
            bar(price, i)
        })
        .collect()
}
