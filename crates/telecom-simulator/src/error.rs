//! Simulation error types.

use thiserror::Error;

/// Simulation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Configuration cannot produce a dataset
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),
}

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;
