//! Contracts for the collaborators around the engine: where bars come from
//! and where signals go.
//!
//! Neither side is implemented here. Broker clients, databases, and caches
//! implement [`BarSource`] and [`SignalSink`]; [`evaluate_instrument`] wires
//! one fetch, one evaluation, and one write together for a single
//! instrument.

use std::{error::Error, fmt::Display};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Bar, Signal, SignalError, SuperTrend};

/// Bars fetched per request unless the caller asks otherwise.
pub const DEFAULT_LOOKBACK: usize = 100;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Window of history to fetch for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarRequest {
    /// Exchange-qualified symbol, e.g. `INFY.NSE`.
    pub instrument: String,
    /// Provider timeframe label, e.g. `day` or `15minute`.
    pub timeframe: String,
    /// Number of most recent bars.
    #[serde(default = "default_lookback")]
    pub lookback: usize,
}

fn default_lookback() -> usize {
    DEFAULT_LOOKBACK
}

impl BarRequest {
    #[must_use]
    pub fn new(instrument: impl Into<String>, timeframe: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            timeframe: timeframe.into(),
            lookback: DEFAULT_LOOKBACK,
        }
    }

    #[must_use]
    pub fn lookback(mut self, bars: usize) -> Self {
        self.lookback = bars;
        self
    }
}

impl Display for BarRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}[{}]", self.instrument, self.timeframe, self.lookback)
    }
}

/// Supplies chronological OHLCV history.
pub trait BarSource {
    type Error: Error + Send + Sync + 'static;

    /// Returns up to `request.lookback` bars, oldest first.
    ///
    /// # Errors
    ///
    /// Provider-specific fetch failures.
    fn bars(&self, request: &BarRequest) -> Result<Vec<Bar>, Self::Error>;
}

/// Identifies who a persisted signal belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalKey {
    pub strategy: String,
    pub instrument: String,
}

impl SignalKey {
    #[must_use]
    pub fn new(strategy: impl Into<String>, instrument: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            instrument: instrument.into(),
        }
    }
}

/// Persists signals returned by the engine.
pub trait SignalSink {
    type Error: Error + Send + Sync + 'static;

    /// Stores `signal` under `key`.
    ///
    /// # Errors
    ///
    /// Storage-specific write failures.
    fn record(&mut self, key: &SignalKey, signal: &Signal) -> Result<(), Self::Error>;
}

/// Failures of [`evaluate_instrument`].
#[derive(Debug, thiserror::Error)]
pub enum EvaluateError {
    #[error("bar source failed for {request}")]
    Source {
        request: BarRequest,
        #[source]
        source: BoxError,
    },

    #[error("signal sink failed for {}/{}", .key.strategy, .key.instrument)]
    Sink {
        key: SignalKey,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Signal(#[from] SignalError),
}

/// Fetches history for one instrument, evaluates it, and records the signal.
///
/// Returns `Ok(None)` when the provider returned too little history; the
/// instrument is skipped and nothing is written. Every other signal
/// (including HOLD) is recorded and returned.
///
/// # Errors
///
/// * [`EvaluateError::Source`] / [`EvaluateError::Sink`] wrap collaborator
///   failures.
/// * [`EvaluateError::Signal`] carries
///   [`SignalError::DegenerateNumeric`]; nothing is written.
pub fn evaluate_instrument<S, K>(
    engine: &SuperTrend,
    source: &S,
    sink: &mut K,
    request: &BarRequest,
    key: &SignalKey,
) -> Result<Option<Signal>, EvaluateError>
where
    S: BarSource,
    K: SignalSink,
{
    let bars = source.bars(request).map_err(|e| EvaluateError::Source {
        request: request.clone(),
        source: Box::new(e),
    })?;

    let signal = match engine.signal(&bars) {
        Ok(signal) => signal,
        Err(SignalError::InsufficientData { required, actual }) => {
            debug!(%request, required, actual, "skipping instrument: insufficient history");
            return Ok(None);
        }
        Err(e) => {
            warn!(%request, error = %e, "discarding degenerate window");
            return Err(e.into());
        }
    };

    sink.record(key, &signal).map_err(|e| EvaluateError::Sink {
        key: key.clone(),
        source: Box::new(e),
    })?;

    if signal.is_actionable() {
        info!(
            strategy = %key.strategy,
            instrument = %key.instrument,
            signal = %signal.signal_type(),
            price = signal.price(),
            strength = signal.strength(),
            "{engine} trend flip"
        );
    } else {
        debug!(
            strategy = %key.strategy,
            instrument = %key.instrument,
            trend = %signal.trend(),
            "no trend change"
        );
    }

    Ok(Some(signal))
}
