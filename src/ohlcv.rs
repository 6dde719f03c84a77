use serde::{Deserialize, Serialize};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar timestamp (epoch milliseconds or a sequence number).
///
/// The engine never inspects it; bars are taken in the order given.
pub type Timestamp = i64;

/// OHLCV bar data used as input to the signal engine.
///
/// Implement this on your own kline/candle type to avoid a conversion
/// pass before every evaluation.
///
/// Bars are expected in chronological order and with
/// `low <= open, close <= high`. Neither is validated: out-of-order or
/// malformed bars produce meaningless values rather than an error.
///
/// # Example
///
/// ```
/// use supertrend_signal::{Ohlcv, Price, Timestamp};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64,
///     ts: i64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn timestamp(&self) -> Timestamp { self.ts }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing (or latest) price of the bar.
    fn close(&self) -> Price;

    /// Bar timestamp.
    fn timestamp(&self) -> Timestamp;

    /// Trade volume during the bar. Defaults to `0.0`.
    fn volume(&self) -> f64 {
        0.0
    }
}

/// Owned OHLCV bar.
///
/// The shape a bar-history provider hands back. Serializes with the field
/// names `timestamp`, `open`, `high`, `low`, `close`, `volume`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    #[must_use]
    pub fn new(timestamp: Timestamp, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    #[must_use]
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Builds a bar from a broker candle row
    /// `[timestamp, open, high, low, close, volume?]`.
    ///
    /// Returns `None` when the row has fewer than five columns. A missing
    /// volume column reads as `0.0`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_candle(row: &[f64]) -> Option<Self> {
        match *row {
            [ts, open, high, low, close, ref rest @ ..] => Some(
                Self::new(ts as Timestamp, open, high, low, close)
                    .with_volume(rest.first().copied().unwrap_or(0.0)),
            ),
            _ => None,
        }
    }
}

impl Ohlcv for Bar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}
