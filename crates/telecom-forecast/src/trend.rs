//! Linear trend fitting and evaluation.
//!
//! Fits `value = intercept + slope * period` by ordinary least squares:
//!
//! ```text
//! slope     = Σ(p - p̄)(v - v̄) / Σ(p - p̄)²
//! intercept = v̄ - slope · p̄
//! ```
//!
//! Sums are taken over centered periods, so years around 2000 do not lose
//! precision to cancellation.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Minimum number of observations accepted by [`fit`].
///
/// A single point has no defined slope; it is rejected rather than fitted
/// with a flat line.
pub const MIN_OBSERVATIONS: usize = 2;

/// Fitted linear trend of one entity.
///
/// Immutable once created; a new trend is fitted for every forecast run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    intercept: f64,
    slope: f64,
    first_period: i32,
    last_period: i32,
    n_observations: usize,
    r_squared: f64,
}

impl LinearTrend {
    /// Value of the line at period zero.
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Change in value per period.
    #[must_use]
    pub const fn slope(&self) -> f64 {
        self.slope
    }

    /// Earliest training period.
    #[must_use]
    pub const fn first_period(&self) -> i32 {
        self.first_period
    }

    /// Latest training period.
    #[must_use]
    pub const fn last_period(&self) -> i32 {
        self.last_period
    }

    /// Number of observations used in the fit.
    #[must_use]
    pub const fn n_observations(&self) -> usize {
        self.n_observations
    }

    /// Coefficient of determination over the training points.
    ///
    /// 1.0 when every training value is identical.
    #[must_use]
    pub const fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Whether `period` lies inside the training range.
    #[must_use]
    pub const fn covers(&self, period: i32) -> bool {
        period >= self.first_period && period <= self.last_period
    }

    /// Evaluate the trend at `period`.
    ///
    /// No plausibility bounds are applied; extrapolated values may be
    /// negative.
    #[must_use]
    pub fn project(&self, period: i32) -> f64 {
        self.intercept + self.slope * f64::from(period)
    }
}

/// Fit a linear trend to one entity's `(period, value)` observations.
///
/// # Errors
///
/// - [`ForecastError::InsufficientData`] with fewer than
///   [`MIN_OBSERVATIONS`] points
/// - [`ForecastError::DegenerateInput`] when all periods are identical
/// - [`ForecastError::NonFiniteValue`] when a value is NaN or infinite
/// - [`ForecastError::NumericOverflow`] when finite values are too large
///   for the coefficients to stay finite
///
/// # Examples
///
/// ```
/// use telecom_forecast::fit;
///
/// let trend = fit(&[(2016, 1000.0), (2017, 1500.0), (2018, 2000.0)]).unwrap();
/// assert_eq!(trend.slope(), 500.0);
/// assert_eq!(trend.intercept(), -1_007_000.0);
/// assert_eq!(trend.project(2023), 4500.0);
/// ```
pub fn fit(series: &[(i32, f64)]) -> Result<LinearTrend> {
    if series.len() < MIN_OBSERVATIONS {
        return Err(ForecastError::InsufficientData {
            required: MIN_OBSERVATIONS,
            actual: series.len(),
        });
    }

    if let Some(&(period, _)) = series.iter().find(|(_, v)| !v.is_finite()) {
        return Err(ForecastError::NonFiniteValue { period });
    }

    let first = series[0].0;
    if series.iter().all(|&(p, _)| p == first) {
        return Err(ForecastError::DegenerateInput { period: first });
    }

    let n = series.len() as f64;
    let period_mean = series.iter().map(|&(p, _)| f64::from(p)).sum::<f64>() / n;
    let value_mean = series.iter().map(|&(_, v)| v).sum::<f64>() / n;

    let (sxx, sxy) = series.iter().fold((0.0, 0.0), |(sxx, sxy), &(p, v)| {
        let dp = f64::from(p) - period_mean;
        (sxx + dp * dp, sxy + dp * (v - value_mean))
    });

    let slope = sxy / sxx;
    let intercept = value_mean - slope * period_mean;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(ForecastError::NumericOverflow { stage: "fitting" });
    }

    let ss_tot: f64 = series.iter().map(|&(_, v)| (v - value_mean).powi(2)).sum();
    let ss_res: f64 = series
        .iter()
        .map(|&(p, v)| (v - (intercept + slope * f64::from(p))).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    let (first_period, last_period) = series
        .iter()
        .fold((i32::MAX, i32::MIN), |(lo, hi), &(p, _)| (lo.min(p), hi.max(p)));

    Ok(LinearTrend {
        intercept,
        slope,
        first_period,
        last_period,
        n_observations: series.len(),
        r_squared,
    })
}

/// Evaluate `trend` at `period`. Equivalent to [`LinearTrend::project`].
#[must_use]
pub fn project(trend: &LinearTrend, period: i32) -> f64 {
    trend.project(period)
}
