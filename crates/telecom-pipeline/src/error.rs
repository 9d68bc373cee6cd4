//! # Pipeline Error Types
//!
//! Unified error handling across pipeline stages.

use telecom_forecast::ForecastError;
use thiserror::Error;

/// Pipeline-level errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Simulation error: {0}")]
    Simulation(#[from] telecom_simulator::SimulationError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] telecom_analytics::AnalyticsError),

    #[error("Forecast failed for {company}: {source}")]
    Forecast {
        company: String,
        #[source]
        source: ForecastError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Short machine-readable code, used as a log field
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Simulation(_) => "SIMULATION_ERROR",
            Self::Analytics(_) => "ANALYTICS_ERROR",
            Self::Forecast { .. } => "FORECAST_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
