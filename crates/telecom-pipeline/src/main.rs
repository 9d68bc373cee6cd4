//! # Telecom Pipeline CLI
//!
//! Generates the telecom dataset, cleans and reports on it, renders charts,
//! and writes a per-company revenue forecast.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use telecom_pipeline::{Config, Pipeline, PipelineOptions};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "telecom-pipeline")]
#[command(about = "Telecom strategic performance analysis and 5-year revenue forecast")]
struct Args {
    /// Generator seed (overrides TELECOM_SEED)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output directory (overrides TELECOM_OUTPUT_DIR)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Years to forecast past the last observed year (overrides TELECOM_FORECAST_HORIZON)
    #[arg(long)]
    horizon: Option<u32>,

    /// Raw dataset CSV to load instead of generating one
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Also export the cleaned table as Parquet
    #[arg(long)]
    parquet: bool,

    /// Abort when any company cannot be forecast
    #[arg(long)]
    fail_fast: bool,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    if config.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    info!(version = telecom_pipeline::VERSION, "Starting Telecom Strategic Analysis");

    let mut options = PipelineOptions::from_config(&config);
    if let Some(seed) = args.seed {
        options.seed = seed;
    }
    if let Some(dir) = args.output_dir {
        options.output_dir = dir;
    }
    if let Some(horizon) = args.horizon {
        options.horizon = horizon;
    }
    options.input = args.input;
    options.parquet = args.parquet;
    options.fail_fast = args.fail_fast;
    options.charts = !args.no_charts;

    let outcome = match Pipeline::new(options).and_then(Pipeline::run) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(code = err.error_code(), error = %err, "Pipeline failed");
            return Err(err.into());
        }
    };

    for projection in outcome.projections.iter().take(5) {
        info!(
            year = projection.period,
            company = %projection.entity_id,
            forecasted_revenue = projection.predicted_value,
            "Forecast"
        );
    }
    for file in &outcome.files {
        info!(path = %file.display(), "Written");
    }

    info!(run_id = %outcome.run_id, "Project completed successfully");
    Ok(())
}
