//! Forecast error types.

use thiserror::Error;

/// Errors raised while fitting an entity's trend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Fewer observations than the fit requires
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Minimum number of observations
        required: usize,
        /// Observations supplied
        actual: usize,
    },

    /// Every training period is the same, so the slope is undefined
    #[error("Degenerate input: all observations share period {period}")]
    DegenerateInput {
        /// The single period shared by every observation
        period: i32,
    },

    /// A value is NaN or infinite
    #[error("Non-finite value at period {period}")]
    NonFiniteValue {
        /// Period of the offending observation
        period: i32,
    },

    /// Finite inputs whose fit or projection overflows `f64`
    #[error("Numeric overflow while {stage}")]
    NumericOverflow {
        /// Step that produced a non-finite result
        stage: &'static str,
    },
}

/// Result type for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;
