//! Multi-period projection for a single entity.

use crate::error::{ForecastError, Result};
use crate::trend::fit;
use telecom_domain::{Observation, Projection};

/// Fit `series` once and project it at every period in `periods`.
///
/// Projections come back in the order the periods were requested. A fit
/// failure aborts the whole horizon; no partial output is produced.
///
/// # Errors
///
/// Propagates any [`ForecastError`] raised by [`fit`], and returns
/// [`ForecastError::NumericOverflow`] if a projection leaves the `f64` range.
pub fn forecast_horizon(
    entity_id: &str,
    series: &[(i32, f64)],
    periods: &[i32],
) -> Result<Vec<Projection>> {
    let trend = fit(series)?;

    periods
        .iter()
        .map(|&period| {
            let predicted_value = trend.project(period);
            if !predicted_value.is_finite() {
                return Err(ForecastError::NumericOverflow { stage: "projecting" });
            }
            Ok(Projection {
                entity_id: entity_id.to_string(),
                period,
                predicted_value,
            })
        })
        .collect()
}

/// [`forecast_horizon`] over observations already filtered to one entity.
///
/// The entity id is taken from the observations themselves.
///
/// # Errors
///
/// Propagates any [`crate::ForecastError`] raised by [`fit`].
pub fn forecast_observations(
    observations: &[Observation],
    periods: &[i32],
) -> Result<Vec<Projection>> {
    let entity_id = observations
        .first()
        .map(|o| o.entity_id.as_str())
        .unwrap_or_default();
    let series: Vec<(i32, f64)> = observations.iter().map(|o| (o.period, o.value)).collect();
    forecast_horizon(entity_id, &series, periods)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERIES: [(i32, f64); 3] = [(2016, 1000.0), (2017, 1500.0), (2018, 2000.0)];

    #[test]
    fn test_horizon_preserves_request_order() {
        let out = forecast_horizon("Telecom_A", &SERIES, &[2024, 2023]).unwrap();
        let periods: Vec<i32> = out.iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![2024, 2023]);
        assert_eq!(out[0].predicted_value, 5000.0);
        assert_eq!(out[1].predicted_value, 4500.0);
    }

    #[test]
    fn test_five_year_horizon() {
        let periods: Vec<i32> = (2023..2028).collect();
        let out = forecast_horizon("Telecom_B", &SERIES, &periods).unwrap();
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|p| p.entity_id == "Telecom_B"));
        assert_eq!(out[4].predicted_value, 6500.0);
    }

    #[test]
    fn test_overflowing_projection_aborts_horizon() {
        let series = [(0, 0.0), (1, 1e308)];
        let err = forecast_horizon("Telecom_A", &series, &[1, 3]).unwrap_err();
        assert_eq!(err, ForecastError::NumericOverflow { stage: "projecting" });
    }

    #[test]
    fn test_empty_horizon_still_fits() {
        assert!(forecast_horizon("Telecom_A", &SERIES, &[]).unwrap().is_empty());
        assert!(forecast_horizon("Telecom_A", &SERIES[..1], &[]).is_err());
    }

    #[test]
    fn test_fit_failure_aborts_horizon() {
        let err = forecast_horizon("Telecom_C", &[(2020, 1.0), (2020, 2.0)], &[2021, 2022])
            .unwrap_err();
        assert_eq!(err, ForecastError::DegenerateInput { period: 2020 });
    }

    #[test]
    fn test_forecast_observations_uses_entity_id() {
        let observations: Vec<Observation> = SERIES
            .iter()
            .map(|&(p, v)| Observation::new("Telecom_A", p, v))
            .collect();
        let out = forecast_observations(&observations, &[2023]).unwrap();
        assert_eq!(out[0].entity_id, "Telecom_A");
        assert_eq!(out[0].predicted_value, 4500.0);
    }

    #[test]
    fn test_forecast_observations_empty() {
        assert!(matches!(
            forecast_observations(&[], &[2023]),
            Err(ForecastError::InsufficientData { actual: 0, .. })
        ));
    }
}
