use std::fmt::Display;

use crate::{
    Ohlcv, Signal, SignalError, SuperTrendConfig, Trend, bands::SuperTrendSeries, signal::classify,
};

/// SuperTrend trend-flip signal engine.
///
/// Each call takes the whole bar window for one instrument and recomputes
/// every derived series from scratch:
///
/// ```text
/// True Range → ATR (Wilder) → basic bands → final bands (ratchet)
///            → trend state → classification of the latest bar
/// ```
///
/// The engine holds only its config. Evaluations allocate their own
/// working vectors, so one engine can be shared across threads and called
/// for many instruments concurrently.
///
/// # Window length
///
/// Windows shorter than [`SuperTrendConfig::required_bars`] fail with
/// [`SignalError::InsufficientData`]. The caller decides whether to skip
/// the instrument or fetch more history.
///
/// # Example
///
/// ```
/// use supertrend_signal::{Bar, SignalType, SuperTrend, SuperTrendConfig, Trend};
///
/// let engine = SuperTrend::new(SuperTrendConfig::default());
///
/// // Flat at 100 for 20 bars, then one bar up at 102.
/// let mut bars: Vec<Bar> = (0..20).map(|t| Bar::new(t, 100.0, 100.0, 100.0, 100.0)).collect();
/// bars.push(Bar::new(20, 102.0, 102.0, 102.0, 102.0));
///
/// let signal = engine.signal(&bars).unwrap();
/// assert_eq!(signal.signal_type(), SignalType::Buy);
/// assert_eq!(signal.trend(), Trend::Uptrend);
/// assert_eq!(signal.price(), 102.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct SuperTrend {
    config: SuperTrendConfig,
}

impl SuperTrend {
    #[must_use]
    pub fn new(config: SuperTrendConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SuperTrendConfig {
        &self.config
    }

    /// Classifies the latest bar of `bars` as BUY, SELL, or HOLD.
    ///
    /// # Errors
    ///
    /// * [`SignalError::InsufficientData`] if `bars` is shorter than
    ///   [`SuperTrendConfig::required_bars`].
    /// * [`SignalError::DegenerateNumeric`] if the latest close or
    ///   SuperTrend value cannot yield a finite distance.
    pub fn signal<B: Ohlcv>(&self, bars: &[B]) -> Result<Signal, SignalError> {
        let required = self.config.required_bars();
        if bars.len() < required {
            return Err(SignalError::InsufficientData {
                required,
                actual: bars.len(),
            });
        }

        let series = SuperTrendSeries::compute(bars, &self.config)?;
        let (previous, current) = series.last_two_trends();
        let close = bars[series.bar_index(series.len() - 1)].close();

        classify(previous, current, close, series.last_supertrend())
    }

    /// Trend of the latest bar.
    ///
    /// # Errors
    ///
    /// Same as [`signal`](Self::signal).
    pub fn current_trend<B: Ohlcv>(&self, bars: &[B]) -> Result<Trend, SignalError> {
        self.signal(bars).map(|signal| signal.trend())
    }

    /// Percent distance between the latest close and the SuperTrend line.
    ///
    /// # Errors
    ///
    /// Same as [`signal`](Self::signal).
    pub fn distance<B: Ohlcv>(&self, bars: &[B]) -> Result<f64, SignalError> {
        self.signal(bars).map(|signal| signal.distance())
    }
}

impl Display for SuperTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SuperTrend({}, {})",
            self.config.period(),
            self.config.multiplier().value()
        )
    }
}
