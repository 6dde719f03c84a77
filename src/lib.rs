//! SuperTrend signal engine.
//!
//! Given a window of OHLCV bars for one instrument, computes the ATR-based
//! SuperTrend bands and classifies the most recent bar as a
//! [`SignalType::Buy`], [`SignalType::Sell`], or [`SignalType::Hold`]
//! decision with a strength and distance figure.
//!
//! Evaluation is a pure function of the window and the
//! [`SuperTrendConfig`]: nothing is cached between calls, nothing is logged,
//! and failures come back as [`SignalError`]. The [`source`] module
//! describes the collaborators that feed bars in and persist signals.
//!
//! ```
//! use supertrend_signal::{Bar, SuperTrend, SuperTrendConfig};
//! use std::num::NonZero;
//!
//! let engine = SuperTrend::new(SuperTrendConfig::with_period(NonZero::new(10).unwrap()));
//! let bars: Vec<Bar> = (0..30).map(|t| Bar::new(t, 100.0, 101.0, 99.0, 100.0)).collect();
//!
//! let signal = engine.signal(&bars).unwrap();
//! println!("{signal}: {}", signal.notes());
//! ```

mod atr;
mod bands;
mod config;
mod engine;
mod error;
mod ohlcv;
mod signal;
pub mod source;

pub use crate::bands::Trend;
pub use crate::config::{Multiplier, SuperTrendConfig, SuperTrendConfigBuilder};
pub use crate::engine::SuperTrend;
pub use crate::error::{ConfigError, SignalError};
pub use crate::ohlcv::{Bar, Ohlcv, Price, Timestamp};
pub use crate::signal::{Signal, SignalType};

#[cfg(test)]
mod test_util;
