//! # Telecom Forecast
//!
//! Per-entity linear trend forecaster.
//!
//! Each entity's history is fitted independently with a closed-form ordinary
//! least-squares line of `value` over `period`, then evaluated at the
//! requested future periods.
//!
//! ## Features
//!
//! - Closed-form univariate OLS (`fit`)
//! - Extrapolation at arbitrary periods (`project`)
//! - Whole-horizon projection in request order (`forecast_horizon`)
//! - Explicit errors for short, degenerate or non-finite series

#![forbid(unsafe_code)]
#![warn(clippy::all, missing_docs)]

pub mod error;
pub mod horizon;
pub mod trend;

pub use error::ForecastError;
pub use horizon::{forecast_horizon, forecast_observations};
pub use trend::{fit, project, LinearTrend, MIN_OBSERVATIONS};
