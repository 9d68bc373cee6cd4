//! Forecast export sink.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use telecom_domain::{round_to, Projection};
use tracing::info;

/// One row of the forecast CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Forecasted_Revenue")]
    pub forecasted_revenue: f64,
}

impl From<&Projection> for ForecastRow {
    fn from(p: &Projection) -> Self {
        Self {
            year: p.period,
            company: p.entity_id.clone(),
            forecasted_revenue: round_to(p.predicted_value, 2),
        }
    }
}

/// Write projections as CSV rows, in the order given.
pub fn write_forecast<W: Write>(writer: W, projections: &[Projection]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    // Header must be present even when nothing was forecast.
    if projections.is_empty() {
        csv.write_record(["Year", "Company", "Forecasted_Revenue"])?;
    }
    for projection in projections {
        csv.serialize(ForecastRow::from(projection))?;
    }
    csv.flush()?;
    Ok(projections.len())
}

/// Write projections to a CSV file.
pub fn write_forecast_csv<P: AsRef<Path>>(path: P, projections: &[Projection]) -> Result<usize> {
    let file = std::fs::File::create(path.as_ref())?;
    let count = write_forecast(file, projections)?;
    info!(rows = count, path = %path.as_ref().display(), "Forecast exported");
    Ok(count)
}
