//! # Telecom Analytics
//!
//! Tabular store and OLAP layer for the telecom performance pipeline.
//! Uses an in-memory DuckDB database for columnar storage and aggregation.
//!
//! ## Features
//!
//! - Record ingest and CSV import
//! - ETL: incomplete-row removal and per-company growth columns
//! - Revenue pivot, profit by region, EBITDA margin by company
//! - JSON and Markdown reports
//! - ECharts HTML charts
//! - CSV / Parquet export, including the forecast sink

#![forbid(unsafe_code)]
#![warn(clippy::all, missing_docs)]

pub mod charts;
pub mod engine;
pub mod error;
pub mod export;
pub mod queries;
pub mod reports;

pub use engine::{AnalyticsEngine, EtlSummary};
pub use error::AnalyticsError;
pub use export::{write_forecast_csv, ForecastRow};
