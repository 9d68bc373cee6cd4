//! # Telecom Simulator
//!
//! Synthetic multi-year financial dataset for a handful of telecom
//! operators.
//!
//! ## Features
//!
//! - Compounding revenue and subscriber growth per company
//! - Randomized cost ratio, churn, region and service mix per year
//! - Explicitly seeded generator: the same seed always yields the same rows

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod generator;

pub use config::SimulationConfig;
pub use error::SimulationError;
pub use generator::DatasetGenerator;
