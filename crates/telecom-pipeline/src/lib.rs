//! # Telecom Strategic Performance Pipeline
//!
//! Orchestrates the full run: synthesize (or import) the dataset, clean it,
//! report on it, chart it, and project each company's revenue forward.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐    ┌──────────────────────────────┐
//! │  telecom-simulator   │───▶│      telecom-analytics       │
//! │  (seeded generator)  │    │ DuckDB store, ETL, reports,  │
//! └──────────────────────┘    │ charts, CSV/Parquet export   │
//!                             └──────────────────────────────┘
//!                                            │ one company at a time
//!                                            ▼
//!                             ┌──────────────────────────────┐
//!                             │      telecom-forecast        │
//!                             │   fit → project × horizon    │
//!                             └──────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{forecast_companies, forecast_periods, Pipeline, PipelineOptions, PipelineOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
