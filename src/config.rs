use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    num::NonZero,
};

use serde::Deserialize;

use crate::ConfigError;

const DEFAULT_PERIOD: NonZero<usize> = match NonZero::new(10) {
    Some(period) => period,
    None => unreachable!(),
};
const DEFAULT_MULTIPLIER: f64 = 3.0;
const DEFAULT_WARM_UP: usize = 10;

/// Two trend samples are needed to detect a flip.
const MIN_TREND_SAMPLES: usize = 2;

/// ATR band width multiplier for SuperTrend.
///
/// Wraps a positive, finite `f64`. Defaults to `3.0`.
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct Multiplier(f64);

impl Multiplier {
    /// Creates a new band multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `value` is zero, negative, infinite, or NaN.
    #[must_use]
    pub fn new(value: f64) -> Self {
        assert!(!value.is_nan(), "multiplier must not be NaN");
        assert!(value.is_finite(), "multiplier must be finite");
        assert!(value > 0.0, "multiplier must be positive");
        Self(value)
    }

    /// Fallible counterpart of [`Multiplier::new`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidMultiplier`] if `value` is not positive and finite.
    pub fn try_new(value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidMultiplier(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Multiplier {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Multiplier {}

impl Hash for Multiplier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self(DEFAULT_MULTIPLIER)
    }
}

/// Configuration for the [`SuperTrend`](crate::SuperTrend) signal engine.
///
/// * `period`: ATR lookback, also the number of leading bars consumed to
///   seed the ATR.
/// * `multiplier`: band width in ATR units.
/// * `warm_up`: extra bars past the seed the caller must supply so the band
///   ratchet has settled. Never less than two, the minimum needed to
///   compare trend samples.
///
/// Configs are value types: cheap to copy, compare, and hash. Each
/// evaluation reads the config and nothing else; there is no state carried
/// between calls.
///
/// # Example
///
/// ```
/// use supertrend_signal::{Multiplier, SuperTrendConfig};
/// use std::num::NonZero;
///
/// let config = SuperTrendConfig::builder()
///     .period(NonZero::new(10).unwrap())
///     .multiplier(Multiplier::new(3.0))
///     .build();
///
/// assert_eq!(config.period(), 10);
/// assert_eq!(config.required_bars(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct SuperTrendConfig {
    period: NonZero<usize>,
    multiplier: Multiplier,
    warm_up: usize,
}

impl SuperTrendConfig {
    /// Returns a new builder with default multiplier and warm-up.
    #[must_use]
    pub fn builder() -> SuperTrendConfigBuilder {
        SuperTrendConfigBuilder::new()
    }

    /// SuperTrend with custom period, multiplier `3.0`, default warm-up.
    #[must_use]
    pub fn with_period(period: NonZero<usize>) -> Self {
        Self::builder().period(period).build()
    }

    /// ATR lookback (number of bars).
    #[inline]
    #[must_use]
    pub fn period(&self) -> usize {
        self.period.get()
    }

    #[inline]
    #[must_use]
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    /// Extra bars required beyond the ATR seed.
    #[inline]
    #[must_use]
    pub fn warm_up(&self) -> usize {
        self.warm_up
    }

    /// Minimum window length accepted by the engine.
    ///
    /// `period + max(warm_up, 2)`, saturating at `usize::MAX` so oversized
    /// configs reject every window instead of overflowing.
    #[inline]
    #[must_use]
    pub fn required_bars(&self) -> usize {
        self.period
            .get()
            .saturating_add(self.warm_up.max(MIN_TREND_SAMPLES))
    }
}

impl Default for SuperTrendConfig {
    /// SuperTrend(10, 3.0) with a 10-bar warm-up.
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            multiplier: Multiplier::default(),
            warm_up: DEFAULT_WARM_UP,
        }
    }
}

impl Display for SuperTrendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SuperTrendConfig({}, {}, {})",
            self.period,
            self.multiplier.value(),
            self.warm_up
        )
    }
}

/// Builder for [`SuperTrendConfig`].
///
/// Defaults: multiplier = `3.0`, warm-up = `10`.
/// Period must be set before calling [`build`](Self::build).
pub struct SuperTrendConfigBuilder {
    period: Option<NonZero<usize>>,
    multiplier: Multiplier,
    warm_up: usize,
}

impl SuperTrendConfigBuilder {
    fn new() -> Self {
        Self {
            period: None,
            multiplier: Multiplier::default(),
            warm_up: DEFAULT_WARM_UP,
        }
    }

    #[inline]
    #[must_use]
    pub fn period(mut self, period: NonZero<usize>) -> Self {
        self.period.replace(period);
        self
    }

    #[inline]
    #[must_use]
    pub fn multiplier(mut self, multiplier: Multiplier) -> Self {
        self.multiplier = multiplier;
        self
    }

    #[inline]
    #[must_use]
    pub fn warm_up(mut self, bars: usize) -> Self {
        self.warm_up = bars;
        self
    }

    /// Builds the config.
    ///
    /// # Panics
    ///
    /// Panics if the period was not set.
    #[inline]
    #[must_use]
    pub fn build(self) -> SuperTrendConfig {
        SuperTrendConfig {
            period: self.period.expect("period is required"),
            multiplier: self.multiplier,
            warm_up: self.warm_up,
        }
    }
}

/// Wire shape of a config, as stored alongside a strategy record.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(alias = "supertrendPeriod", default = "default_period")]
    period: usize,
    #[serde(alias = "supertrendMultiplier", default = "default_multiplier")]
    multiplier: f64,
    #[serde(alias = "warmUp", default = "default_warm_up")]
    warm_up: usize,
}

fn default_period() -> usize {
    DEFAULT_PERIOD.get()
}

fn default_multiplier() -> f64 {
    DEFAULT_MULTIPLIER
}

fn default_warm_up() -> usize {
    DEFAULT_WARM_UP
}

impl TryFrom<RawConfig> for SuperTrendConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let period = NonZero::new(raw.period).ok_or(ConfigError::ZeroPeriod)?;

        Ok(Self::builder()
            .period(period)
            .multiplier(Multiplier::try_new(raw.multiplier)?)
            .warm_up(raw.warm_up)
            .build())
    }
}
