//! Final SuperTrend bands and trend state.
//!
//! Series index `k` describes raw bar `k + period` and reads ATR entry
//! `k + period - 1`, the first of which is the seed. Nothing is re-sliced;
//! every lookup goes through [`SuperTrendSeries::bar_index`].
//!
//! Pairing sample `k` with ATR entry `k` instead would read the zero
//! placeholders before the seed. Signals computed that way fire on
//! different bars for short windows, so they will not line up bar-for-bar
//! with this layout.

use std::fmt::Display;

use serde::Serialize;

use crate::{Ohlcv, Price, SignalError, SuperTrendConfig, atr::average_true_range};

/// Trend state of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Uptrend,
    Downtrend,
}

impl Trend {
    /// `+1` for [`Trend::Uptrend`], `-1` for [`Trend::Downtrend`].
    #[must_use]
    pub fn flag(self) -> i8 {
        match self {
            Self::Uptrend => 1,
            Self::Downtrend => -1,
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uptrend => f.write_str("UPTREND"),
            Self::Downtrend => f.write_str("DOWNTREND"),
        }
    }
}

/// Aligned band and trend series for one bar window.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SuperTrendSeries {
    period: usize,
    pub(crate) atr: Vec<Price>,
    pub(crate) final_upper: Vec<Price>,
    pub(crate) final_lower: Vec<Price>,
    pub(crate) supertrend: Vec<Price>,
    pub(crate) trend: Vec<Trend>,
}

impl SuperTrendSeries {
    /// Computes the full series over `bars`.
    ///
    /// # Errors
    ///
    /// [`SignalError::InsufficientData`] when fewer than two trend samples
    /// can be produced (`bars.len() < period + 2`).
    #[allow(clippy::float_cmp)]
    pub(crate) fn compute<B: Ohlcv>(
        bars: &[B],
        config: &SuperTrendConfig,
    ) -> Result<Self, SignalError> {
        let period = config.period();
        let required = period.saturating_add(2);

        if bars.len() < required {
            return Err(SignalError::InsufficientData {
                required,
                actual: bars.len(),
            });
        }

        let atr = average_true_range(bars, period)?;
        let multiplier = config.multiplier().value();
        let len = bars.len() - period;

        let mut final_upper = Vec::with_capacity(len);
        let mut final_lower = Vec::with_capacity(len);
        let mut supertrend = Vec::with_capacity(len);
        let mut trend = Vec::with_capacity(len);

        for k in 0..len {
            let bar = &bars[k + period];
            let width = multiplier * atr[k + period - 1];
            let mid = (bar.high() + bar.low()) / 2.0;
            let basic_upper = mid + width;
            let basic_lower = mid - width;

            if k == 0 {
                final_upper.push(basic_upper);
                final_lower.push(basic_lower);
                supertrend.push(basic_upper);
                trend.push(Trend::Downtrend);
                continue;
            }

            let prev_close = bars[k + period - 1].close();
            let prev_upper = final_upper[k - 1];
            let prev_lower = final_lower[k - 1];

            // Bands only move toward price unless the previous close broke through.
            let upper = if basic_upper < prev_upper || prev_close > prev_upper {
                basic_upper
            } else {
                prev_upper
            };
            let lower = if basic_lower > prev_lower || prev_close < prev_lower {
                basic_lower
            } else {
                prev_lower
            };

            let close = bar.close();
            let (value, state) = if supertrend[k - 1] == prev_upper {
                if close <= upper {
                    (upper, Trend::Downtrend)
                } else {
                    (lower, Trend::Uptrend)
                }
            } else if close >= lower {
                (lower, Trend::Uptrend)
            } else {
                (upper, Trend::Downtrend)
            };

            final_upper.push(upper);
            final_lower.push(lower);
            supertrend.push(value);
            trend.push(state);
        }

        Ok(Self {
            period,
            atr,
            final_upper,
            final_lower,
            supertrend,
            trend,
        })
    }

    /// Number of trend samples (`bars.len() - period`).
    pub(crate) fn len(&self) -> usize {
        self.trend.len()
    }

    /// Raw bar index described by series index `k`.
    pub(crate) fn bar_index(&self, k: usize) -> usize {
        k + self.period
    }

    /// Trend of the last two samples, oldest first.
    pub(crate) fn last_two_trends(&self) -> (Trend, Trend) {
        let n = self.len();
        (self.trend[n - 2], self.trend[n - 1])
    }

    pub(crate) fn last_supertrend(&self) -> Price {
        self.supertrend[self.len() - 1]
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        Bar, Multiplier,
        test_util::{flat, flat_then_rising, nz, rising_then_falling},
    };
    use proptest::prelude::*;

    fn config(period: usize, multiplier: f64) -> SuperTrendConfig {
        SuperTrendConfig::builder()
            .period(nz(period))
            .multiplier(Multiplier::new(multiplier))
            .build()
    }

    mod alignment {
        use super::*;

        #[test]
        fn series_length_is_bars_minus_period() {
            let bars = flat_then_rising();
            for n in 12..=bars.len() {
                let series = SuperTrendSeries::compute(&bars[..n], &config(10, 3.0)).unwrap();
                assert_eq!(series.atr.len(), n - 1);
                assert_eq!(series.len(), n - 10);
                assert_eq!(series.final_upper.len(), n - 10);
                assert_eq!(series.final_lower.len(), n - 10);
                assert_eq!(series.supertrend.len(), n - 10);
                assert_eq!(series.bar_index(series.len() - 1), n - 1);
            }
        }

        #[test]
        fn first_sample_uses_seeded_atr() {
            // period 2: TR = [2, 4, ...], seed = 3 at ATR index 1 → raw bar 2
            let bars = [
                Bar::new(0, 100.0, 100.0, 100.0, 100.0),
                Bar::new(1, 102.0, 102.0, 102.0, 102.0),
                Bar::new(2, 106.0, 106.0, 106.0, 106.0),
                Bar::new(3, 106.0, 106.0, 106.0, 106.0),
            ];
            let series = SuperTrendSeries::compute(&bars, &config(2, 1.0)).unwrap();
            assert_eq!(series.final_upper[0], 109.0);
            assert_eq!(series.final_lower[0], 103.0);
            assert_eq!(series.supertrend[0], 109.0);
            assert_eq!(series.trend[0], Trend::Downtrend);
        }

        #[test]
        fn rejects_window_of_exactly_period() {
            assert_eq!(
                SuperTrendSeries::compute(&flat(10.0, 10), &config(10, 3.0)),
                Err(SignalError::InsufficientData {
                    required: 12,
                    actual: 10
                })
            );
        }

        #[test]
        fn rejects_single_trend_sample() {
            assert!(SuperTrendSeries::compute(&flat(10.0, 11), &config(10, 3.0)).is_err());
        }

        #[test]
        fn accepts_two_trend_samples() {
            let series = SuperTrendSeries::compute(&flat(10.0, 12), &config(10, 3.0)).unwrap();
            assert_eq!(series.len(), 2);
        }
    }

    mod trend_state {
        use super::*;

        #[test]
        fn flags_and_labels() {
            assert_eq!(Trend::Uptrend.flag(), 1);
            assert_eq!(Trend::Downtrend.flag(), -1);
            assert_eq!(Trend::Uptrend.to_string(), "UPTREND");
            assert_eq!(Trend::Downtrend.to_string(), "DOWNTREND");
        }

        #[test]
        fn seeds_as_downtrend() {
            let series = SuperTrendSeries::compute(&flat_then_rising(), &config(10, 3.0)).unwrap();
            assert_eq!(series.trend[0], Trend::Downtrend);
            assert_eq!(series.supertrend[0], series.final_upper[0]);
        }

        #[test]
        fn flat_then_rising_flips_up_once_at_first_rise() {
            let series = SuperTrendSeries::compute(&flat_then_rising(), &config(10, 3.0)).unwrap();

            let flips: Vec<usize> = (1..series.len())
                .filter(|&k| series.trend[k] != series.trend[k - 1])
                .collect();
            assert_eq!(flips, vec![10]);
            assert_eq!(series.bar_index(10), 20);

            // Upper band stayed at 100 while price sat on it.
            assert_eq!(series.final_upper[9], 100.0);
            assert!(series.trend[..10].iter().all(|&t| t == Trend::Downtrend));
            assert!(series.trend[10..].iter().all(|&t| t == Trend::Uptrend));

            // 102 − 3 × 0.2
            assert!((series.supertrend[10] - 101.4).abs() < 1e-12);
        }

        #[test]
        fn rising_then_falling_flips_down() {
            let series =
                SuperTrendSeries::compute(&rising_then_falling(), &config(5, 2.0)).unwrap();
            let last = series.len() - 1;
            assert_eq!(series.trend[last], Trend::Downtrend);
            assert!(series.trend.contains(&Trend::Uptrend));
        }

        #[test]
        fn touching_upper_band_stays_down() {
            let series = SuperTrendSeries::compute(&flat(50.0, 20), &config(5, 3.0)).unwrap();
            // Zero ATR: close sits exactly on the upper band every bar.
            assert!(series.trend.iter().all(|&t| t == Trend::Downtrend));
            assert!(series.supertrend.iter().all(|&v| v == 50.0));
        }
    }

    mod ratchet {
        use super::*;

        #[test]
        fn lower_band_only_rises_in_uptrend() {
            let series = SuperTrendSeries::compute(&flat_then_rising(), &config(10, 3.0)).unwrap();
            for k in 11..series.len() {
                assert!(series.final_lower[k] >= series.final_lower[k - 1]);
            }
        }

        #[test]
        fn upper_band_resets_after_breakout() {
            let series = SuperTrendSeries::compute(&flat_then_rising(), &config(10, 3.0)).unwrap();
            // Close 102 broke above 100 on sample 10, so sample 11 takes the basic band.
            // 104 + 3 × 0.38
            assert!((series.final_upper[11] - 105.14).abs() < 1e-12);
        }
    }

    fn random_walk() -> impl Strategy<Value = Vec<Bar>> {
        (
            50.0..500.0_f64,
            prop::collection::vec((-0.03..0.03_f64, 0.0..0.02_f64, 0.0..0.02_f64), 20..120),
        )
            .prop_map(|(start, steps)| {
                let mut close = start;
                steps
                    .into_iter()
                    .zip(0_i64..)
                    .map(|((change, up, down), t)| {
                        let open = close;
                        close = open * (1.0 + change);
                        let high = open.max(close) * (1.0 + up);
                        let low = open.min(close) * (1.0 - down);
                        Bar::new(t, open, high, low, close)
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn ratchet_is_monotonic(bars in random_walk(), period in 1..15_usize, m in 0.5..5.0_f64) {
            let series = SuperTrendSeries::compute(&bars, &config(period, m)).unwrap();
            for k in 1..series.len() {
                let prev_close = bars[series.bar_index(k) - 1].close;
                if prev_close >= series.final_lower[k - 1] {
                    prop_assert!(series.final_lower[k] >= series.final_lower[k - 1]);
                }
                if prev_close <= series.final_upper[k - 1] {
                    prop_assert!(series.final_upper[k] <= series.final_upper[k - 1]);
                }
            }
        }

        #[test]
        fn supertrend_tracks_the_band_of_its_trend(bars in random_walk(), period in 1..15_usize) {
            let series = SuperTrendSeries::compute(&bars, &config(period, 3.0)).unwrap();
            for k in 0..series.len() {
                let band = match series.trend[k] {
                    Trend::Uptrend => series.final_lower[k],
                    Trend::Downtrend => series.final_upper[k],
                };
                prop_assert_eq!(series.supertrend[k], band);
            }
        }

        #[test]
        fn prefix_agrees_without_look_ahead(bars in random_walk(), period in 1..15_usize) {
            let config = config(period, 3.0);
            let full = SuperTrendSeries::compute(&bars, &config).unwrap();
            let shorter = &bars[..bars.len() - 1];
            prop_assume!(shorter.len() >= period + 2);
            let prefix = SuperTrendSeries::compute(shorter, &config).unwrap();

            prop_assert_eq!(&full.atr[..prefix.atr.len()], &prefix.atr[..]);
            prop_assert_eq!(&full.supertrend[..prefix.len()], &prefix.supertrend[..]);
            prop_assert_eq!(&full.trend[..prefix.len()], &prefix.trend[..]);
        }

        #[test]
        fn deterministic(bars in random_walk(), period in 1..15_usize) {
            let config = config(period, 3.0);
            let a = SuperTrendSeries::compute(&bars, &config).unwrap();
            let b = SuperTrendSeries::compute(&bars, &config).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
