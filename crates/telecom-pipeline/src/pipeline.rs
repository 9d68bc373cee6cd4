//! # Pipeline Stages
//!
//! generate → store → clean → report → chart → forecast → export.

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use std::path::{Path, PathBuf};
use telecom_analytics::{charts, reports, write_forecast_csv, AnalyticsEngine, EtlSummary};
use telecom_domain::Projection;
use telecom_forecast::{forecast_observations, ForecastError};
use telecom_simulator::{DatasetGenerator, SimulationConfig};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const RAW_CSV: &str = "telecom_raw_data.csv";
pub const CLEANED_CSV: &str = "telecom_cleaned_data.csv";
pub const FORECAST_CSV: &str = "telecom_forecast_data.csv";
pub const FINAL_CSV: &str = "telecom_data.csv";
pub const CLEANED_PARQUET: &str = "telecom_cleaned_data.parquet";
pub const REVENUE_CHART: &str = "revenue_trend.html";
pub const PROFIT_CHART: &str = "profit_by_region.html";
pub const REPORT_MD: &str = "analytics_report.md";
pub const REPORT_JSON: &str = "analytics_report.json";

/// Options of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub output_dir: PathBuf,
    pub seed: u64,
    pub horizon: u32,
    /// Raw CSV to import instead of generating a dataset
    pub input: Option<PathBuf>,
    pub parquet: bool,
    /// Abort on the first company whose trend cannot be fitted
    pub fail_fast: bool,
    pub charts: bool,
}

impl PipelineOptions {
    /// Options seeded from configuration, with every optional stage at its default
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            seed: config.seed,
            horizon: config.forecast_horizon,
            input: None,
            parquet: false,
            fail_fast: false,
            charts: true,
        }
    }
}

/// What a completed run produced
#[derive(Debug)]
pub struct PipelineOutcome {
    pub run_id: Uuid,
    pub etl: EtlSummary,
    pub periods: Vec<i32>,
    pub projections: Vec<Projection>,
    /// Companies without a forecast, with the reason
    pub skipped: Vec<(String, ForecastError)>,
    pub files: Vec<PathBuf>,
}

/// Projections of every company plus the companies that could not be fitted
#[derive(Debug, Default)]
pub struct CompanyForecasts {
    pub projections: Vec<Projection>,
    pub skipped: Vec<(String, ForecastError)>,
}

/// Single pipeline run over an in-memory store
pub struct Pipeline {
    options: PipelineOptions,
    engine: AnalyticsEngine,
    run_id: Uuid,
    files: Vec<PathBuf>,
}

impl Pipeline {
    /// Prepare a run; validates options and opens the store
    pub fn new(options: PipelineOptions) -> PipelineResult<Self> {
        if options.horizon == 0 {
            return Err(PipelineError::InvalidInput(
                "forecast horizon must be at least one year".to_string(),
            ));
        }

        Ok(Self {
            options,
            engine: AnalyticsEngine::new_in_memory()?,
            run_id: Uuid::new_v4(),
            files: Vec::new(),
        })
    }

    /// Execute every stage in order
    pub fn run(mut self) -> PipelineResult<PipelineOutcome> {
        info!(
            run_id = %self.run_id,
            output_dir = %self.options.output_dir.display(),
            "Starting telecom pipeline"
        );
        std::fs::create_dir_all(&self.options.output_dir)?;

        self.load()?;
        let etl = self.clean()?;
        self.report()?;
        if self.options.charts {
            self.chart()?;
        }

        let periods = forecast_periods(self.engine.last_year()?, self.options.horizon)?;
        let forecasts = forecast_companies(&self.engine, &periods, self.options.fail_fast)?;

        let path = self.output(FORECAST_CSV);
        write_forecast_csv(&path, &forecasts.projections)?;
        self.files.push(path);

        let path = self.output(FINAL_CSV);
        self.engine.export_cleaned_csv(&path)?;
        self.files.push(path);

        if self.options.parquet {
            let path = self.output(CLEANED_PARQUET);
            self.engine.export_to_parquet(&path)?;
            self.files.push(path);
        }

        info!(
            run_id = %self.run_id,
            projections = forecasts.projections.len(),
            skipped = forecasts.skipped.len(),
            files = self.files.len(),
            "Pipeline completed"
        );

        Ok(PipelineOutcome {
            run_id: self.run_id,
            etl,
            periods,
            projections: forecasts.projections,
            skipped: forecasts.skipped,
            files: self.files,
        })
    }

    fn output(&self, name: &str) -> PathBuf {
        output_path(&self.options.output_dir, name)
    }

    /// Fill the raw table from the input file or the generator
    fn load(&mut self) -> PipelineResult<()> {
        match &self.options.input {
            Some(input) => {
                let count = self.engine.import_csv(input)?;
                if count == 0 {
                    return Err(PipelineError::InvalidInput(format!(
                        "{} contains no rows",
                        input.display()
                    )));
                }
            }
            None => {
                let config = SimulationConfig::with_seed(self.options.seed);
                let mut generator = DatasetGenerator::new(config)?;
                let records = generator.generate();
                self.engine.ingest_records_batch(&records)?;
            }
        }

        let path = self.output(RAW_CSV);
        self.engine.export_raw_csv(&path)?;
        self.files.push(path);
        Ok(())
    }

    fn clean(&mut self) -> PipelineResult<EtlSummary> {
        let etl = self.engine.run_etl()?;
        for record in self.engine.cleaned_records(5)? {
            debug!(
                year = record.record.year,
                company = %record.record.company,
                revenue = record.record.revenue,
                revenue_growth_pct = record.revenue_growth_pct,
                "Cleaned row"
            );
        }

        let path = self.output(CLEANED_CSV);
        self.engine.export_cleaned_csv(&path)?;
        self.files.push(path);
        Ok(etl)
    }

    fn report(&mut self) -> PipelineResult<()> {
        let report = self.engine.generate_report(self.run_id)?;
        for margin in &report.avg_ebitda_by_company {
            info!(
                company = %margin.company,
                avg_ebitda_margin_pct = margin.avg_ebitda_margin_pct,
                "Average EBITDA margin"
            );
        }
        for region in &report.profit_by_region {
            info!(region = %region.region, total_profit = region.total_profit, "Profit by region");
        }

        let path = self.output(REPORT_MD);
        std::fs::write(&path, reports::report_markdown(&report))?;
        self.files.push(path);

        let path = self.output(REPORT_JSON);
        std::fs::write(&path, reports::report_json(&report)?)?;
        self.files.push(path);
        Ok(())
    }

    fn chart(&mut self) -> PipelineResult<()> {
        let pivot = self.engine.revenue_pivot()?;
        let title = charts::revenue_trend_title(&pivot);
        let path = self.output(REVENUE_CHART);
        charts::save_chart(&charts::revenue_trend_chart(&pivot), &path, &title)?;
        self.files.push(path);

        let regions = self.engine.profit_by_region()?;
        let path = self.output(PROFIT_CHART);
        charts::save_chart(&charts::profit_by_region_chart(&regions), &path, "Profit by Region")?;
        self.files.push(path);
        Ok(())
    }
}

/// The `horizon` years following `last_year`, ascending
pub fn forecast_periods(last_year: i32, horizon: u32) -> PipelineResult<Vec<i32>> {
    let horizon = i32::try_from(horizon)
        .map_err(|_| PipelineError::InvalidInput(format!("horizon {horizon} is too large")))?;
    if horizon == 0 {
        return Err(PipelineError::InvalidInput(
            "forecast horizon must be at least one year".to_string(),
        ));
    }
    let last = last_year
        .checked_add(horizon)
        .ok_or_else(|| PipelineError::InvalidInput(format!("horizon {horizon} overflows year")))?;
    Ok((last_year + 1..=last).collect())
}

/// Forecast every company of the cleaned table, one at a time.
///
/// A company whose trend cannot be fitted contributes no rows. It is logged
/// and skipped, or aborts the run when `fail_fast` is set.
pub fn forecast_companies(
    engine: &AnalyticsEngine,
    periods: &[i32],
    fail_fast: bool,
) -> PipelineResult<CompanyForecasts> {
    let mut out = CompanyForecasts::default();

    for company in engine.companies()? {
        let series = engine.revenue_series(&company)?;
        match forecast_observations(&series, periods) {
            Ok(projections) => {
                debug!(
                    company = %company,
                    observations = series.len(),
                    first = ?projections.first().map(|p| p.predicted_value),
                    last = ?projections.last().map(|p| p.predicted_value),
                    "Revenue trend projected"
                );
                out.projections.extend(projections);
            }
            Err(source) if fail_fast => {
                return Err(PipelineError::Forecast { company, source });
            }
            Err(source) => {
                warn!(company = %company, error = %source, "Skipping company forecast");
                out.skipped.push((company, source));
            }
        }
    }

    info!(
        companies = out.projections.len() / periods.len().max(1),
        periods = periods.len(),
        skipped = out.skipped.len(),
        "Forecast generated"
    );
    Ok(out)
}

/// Path of one of the pipeline's output files inside `dir`
pub fn output_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}
