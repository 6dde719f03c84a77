//! True Range and Wilder-smoothed Average True Range over a bar window.
//!
//! Both series are indexed from the second raw bar: entry `j` describes raw
//! bar `j + 1`, because the first bar has no previous close.

use crate::{Ohlcv, Price, SignalError};

/// `max(high - low, |high - prev_close|, |low - prev_close|)`.
#[inline]
pub(crate) fn true_range(ohlcv: &impl Ohlcv, prev_close: Price) -> Price {
    let hl = ohlcv.high() - ohlcv.low();
    let hc = (ohlcv.high() - prev_close).abs();
    let lc = (ohlcv.low() - prev_close).abs();
    hl.max(hc).max(lc)
}

/// True Range of every bar after the first. Length `bars.len() - 1`.
pub(crate) fn true_range_series<B: Ohlcv>(bars: &[B]) -> Vec<Price> {
    bars.windows(2)
        .map(|pair| true_range(&pair[1], pair[0].close()))
        .collect()
}

/// Average True Range with Wilder's smoothing.
///
/// The first `period` True Range values are averaged into a seed stored at
/// index `period - 1`; every later entry is smoothed:
///
/// ```text
/// ATR[i] = (ATR[i-1] × (period − 1) + TR[i]) / period
/// ```
///
/// Entries before the seed are zero placeholders. Output length equals
/// `bars.len() - 1`.
///
/// # Errors
///
/// [`SignalError::InsufficientData`] unless `bars.len() > period`.
pub(crate) fn average_true_range<B: Ohlcv>(
    bars: &[B],
    period: usize,
) -> Result<Vec<Price>, SignalError> {
    debug_assert!(period > 0, "period must be positive");

    if bars.len() <= period {
        return Err(SignalError::InsufficientData {
            required: period.saturating_add(1),
            actual: bars.len(),
        });
    }

    let tr = true_range_series(bars);
    let mut atr = vec![0.0; tr.len()];

    #[allow(clippy::cast_precision_loss)]
    let length = period as f64;
    let length_minus_one = length - 1.0;

    atr[period - 1] = tr[..period].iter().sum::<Price>() / length;

    for i in period..tr.len() {
        atr[i] = (atr[i - 1] * length_minus_one + tr[i]) / length;
    }

    Ok(atr)
}
