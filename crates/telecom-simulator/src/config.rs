//! Simulation parameters.

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeInclusive};
use telecom_domain::{Region, ServiceType};

/// Longest year range a config may span.
pub const MAX_YEAR_SPAN: i32 = 1_000;

/// Dataset shape and the sampling ranges used per company and per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// RNG seed
    pub seed: u64,

    /// First simulated year (inclusive)
    pub start_year: i32,

    /// Last simulated year (inclusive)
    pub end_year: i32,

    /// Company names, in output order
    pub companies: Vec<String>,

    /// Regions a row may be attributed to
    pub regions: Vec<Region>,

    /// Service types a row may be attributed to
    pub service_types: Vec<ServiceType>,

    /// Opening revenue per company
    pub initial_revenue: Range<i64>,

    /// Opening subscriber base per company, in millions
    pub initial_subscribers: Range<i64>,

    /// Market share per company, held for every year
    pub market_share_pct: Range<f64>,

    /// Revenue added each year
    pub revenue_increment: Range<i64>,

    /// Subscribers added each year, in millions
    pub subscriber_increment: Range<f64>,

    /// Churn rate percentage
    pub churn_pct: Range<f64>,

    /// Operating cost as a fraction of revenue
    pub cost_ratio: Range<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_year: 2016,
            end_year: 2022,
            companies: ["Telecom_A", "Telecom_B", "Telecom_C"]
                .into_iter()
                .map(String::from)
                .collect(),
            regions: Region::ALL.to_vec(),
            service_types: ServiceType::ALL.to_vec(),
            initial_revenue: 20_000..30_000,
            initial_subscribers: 10..20,
            market_share_pct: 20.0..40.0,
            revenue_increment: 1_500..4_000,
            subscriber_increment: 0.5..2.0,
            churn_pct: 5.0..15.0,
            cost_ratio: 0.55..0.75,
        }
    }
}

impl SimulationConfig {
    /// Default config with a different seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Simulated years, ascending.
    #[must_use]
    pub const fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    /// Total rows the generator will produce.
    #[must_use]
    pub fn expected_rows(&self) -> usize {
        self.end_year
            .checked_sub(self.start_year)
            .and_then(|span| span.checked_add(1))
            .and_then(|years| usize::try_from(years).ok())
            .map_or(0, |years| years.saturating_mul(self.companies.len()))
    }

    /// Reject configs that cannot produce a dataset.
    pub fn validate(&self) -> Result<()> {
        if self.companies.is_empty() {
            return Err(SimulationError::InvalidConfig("no companies".to_string()));
        }
        if self.regions.is_empty() {
            return Err(SimulationError::InvalidConfig("no regions".to_string()));
        }
        if self.service_types.is_empty() {
            return Err(SimulationError::InvalidConfig("no service types".to_string()));
        }
        if self.start_year > self.end_year {
            return Err(SimulationError::InvalidConfig(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }
        if self
            .end_year
            .checked_sub(self.start_year)
            .is_none_or(|span| span >= MAX_YEAR_SPAN)
        {
            return Err(SimulationError::InvalidConfig(format!(
                "year range {}..={} exceeds {MAX_YEAR_SPAN} years",
                self.start_year, self.end_year
            )));
        }

        let int_ranges = [
            ("initial_revenue", &self.initial_revenue),
            ("initial_subscribers", &self.initial_subscribers),
            ("revenue_increment", &self.revenue_increment),
        ];
        for (name, range) in int_ranges {
            if range.is_empty() {
                return Err(SimulationError::InvalidConfig(format!("empty range: {name}")));
            }
        }

        let float_ranges = [
            ("market_share_pct", &self.market_share_pct),
            ("subscriber_increment", &self.subscriber_increment),
            ("churn_pct", &self.churn_pct),
            ("cost_ratio", &self.cost_ratio),
        ];
        for (name, range) in float_ranges {
            if range.is_empty() {
                return Err(SimulationError::InvalidConfig(format!("empty range: {name}")));
            }
        }

        if self.initial_subscribers.start <= 0 {
            return Err(SimulationError::InvalidConfig(
                "initial subscribers must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
