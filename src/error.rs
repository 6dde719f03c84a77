use crate::Price;

/// Failures returned by [`SuperTrend`](crate::SuperTrend) evaluation.
///
/// Both variants are recoverable by the caller: skip the instrument and try
/// again with more history, or discard the window.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SignalError {
    /// The window is too short to seed the ATR and produce two trend samples.
    #[error("insufficient data: {required} bars required, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// The latest close or SuperTrend value cannot produce a finite,
    /// non-negative distance (zero, negative, or non-finite prices).
    #[error("degenerate numeric result: close={close}, supertrend={supertrend}")]
    DegenerateNumeric { close: Price, supertrend: Price },
}

/// Invalid [`SuperTrendConfig`](crate::SuperTrendConfig) values supplied
/// through deserialization or the fallible constructors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("period must be greater than zero")]
    ZeroPeriod,

    #[error("multiplier must be positive and finite, got {0}")]
    InvalidMultiplier(f64),
}
