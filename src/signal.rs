use std::fmt::Display;

use serde::Serialize;

use crate::{Price, SignalError, Trend};

const MIN_STRENGTH: f64 = 0.1;
const MAX_STRENGTH: f64 = 1.0;
const HOLD_STRENGTH: f64 = 0.5;

/// Scales the fractional gap to the SuperTrend line into a strength.
const STRENGTH_SCALE: f64 = 10.0;

/// Decision taken for the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    /// Trend flipped from down to up on the latest bar.
    Buy,
    /// Trend flipped from up to down on the latest bar.
    Sell,
    /// No flip.
    Hold,
}

impl Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => f.write_str("BUY"),
            Self::Sell => f.write_str("SELL"),
            Self::Hold => f.write_str("HOLD"),
        }
    }
}

/// SuperTrend decision for the most recent bar of a window.
///
/// * `strength`: `0.1..=1.0` for [`SignalType::Buy`] and
///   [`SignalType::Sell`], always `0.5` for [`SignalType::Hold`].
/// * `price`: latest close.
/// * `distance`: `|close − supertrend| / supertrend × 100`, in percent.
///
/// Owned by the caller once returned; serializes with upper-case enum
/// values so it can be stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    #[serde(rename = "type")]
    signal_type: SignalType,
    strength: f64,
    price: Price,
    trend: Trend,
    distance: f64,
    notes: String,
}

impl Signal {
    #[inline]
    #[must_use]
    pub fn signal_type(&self) -> SignalType {
        self.signal_type
    }

    #[inline]
    #[must_use]
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Latest close.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Trend of the latest bar.
    #[inline]
    #[must_use]
    pub fn trend(&self) -> Trend {
        self.trend
    }

    /// Percent gap between price and the SuperTrend line.
    #[inline]
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// `true` for BUY and SELL.
    #[inline]
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        self.signal_type != SignalType::Hold
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(price: {}, strength: {:.2}, {}, distance: {:.2}%)",
            self.signal_type, self.price, self.strength, self.trend, self.distance
        )
    }
}

/// Classifies the latest bar from the last two trend samples.
///
/// | previous  | current   | decision | strength                           |
/// |-----------|-----------|----------|------------------------------------|
/// | DOWNTREND | UPTREND   | BUY      | `(close − st) / st × 10`, clamped  |
/// | UPTREND   | DOWNTREND | SELL     | `(st − close) / close × 10`, clamped |
/// | any other |           | HOLD     | `0.5`                              |
///
/// # Errors
///
/// [`SignalError::DegenerateNumeric`] when `close` or `supertrend` is not
/// positive and finite, or the derived figures are not finite.
pub(crate) fn classify(
    previous: Trend,
    current: Trend,
    close: Price,
    supertrend: Price,
) -> Result<Signal, SignalError> {
    let degenerate = || SignalError::DegenerateNumeric { close, supertrend };

    if !(close.is_finite() && close > 0.0 && supertrend.is_finite() && supertrend > 0.0) {
        return Err(degenerate());
    }

    let distance = (close - supertrend).abs() / supertrend * 100.0;

    let (signal_type, strength, notes) = match (previous, current) {
        (Trend::Downtrend, Trend::Uptrend) => (
            SignalType::Buy,
            clamp_strength((close - supertrend) / supertrend * STRENGTH_SCALE),
            flip_notes(SignalType::Buy, previous, current, distance),
        ),
        (Trend::Uptrend, Trend::Downtrend) => (
            SignalType::Sell,
            clamp_strength((supertrend - close) / close * STRENGTH_SCALE),
            flip_notes(SignalType::Sell, previous, current, distance),
        ),
        _ => (
            SignalType::Hold,
            HOLD_STRENGTH,
            format!("No trend change. Current trend: {current}"),
        ),
    };

    if !(distance.is_finite() && strength.is_finite()) {
        return Err(degenerate());
    }

    Ok(Signal {
        signal_type,
        strength,
        price: close,
        trend: current,
        distance,
        notes,
    })
}

#[inline]
fn clamp_strength(raw: f64) -> f64 {
    raw.clamp(MIN_STRENGTH, MAX_STRENGTH)
}

/// The figure shown is always `|close − st| / st`, the same as
/// [`Signal::distance`], including for SELL. Stored rows that divided the
/// SELL gap by the close will read slightly differently.
fn flip_notes(signal_type: SignalType, from: Trend, to: Trend, distance: f64) -> String {
    format!("SuperTrend {signal_type} signal. Trend changed from {from} to {to}. Distance: {distance:.2}%")
}
