//! Dataset generation orchestrating every simulated company.

use crate::config::SimulationConfig;
use crate::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use telecom_domain::{round_to, TelecomRecord};
use tracing::{debug, info};

/// Running state of one company across simulated years.
#[derive(Debug, Clone)]
struct CompanyState {
    name: String,
    revenue: f64,
    subscribers: f64,
    market_share_pct: f64,
}

/// Seeded generator for the synthetic telecom dataset.
///
/// All randomness flows from the generator's own `StdRng`, so two
/// generators built from the same config produce identical rows.
pub struct DatasetGenerator {
    config: SimulationConfig,
    rng: StdRng,
}

impl DatasetGenerator {
    /// Create a generator, validating the config first.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self { config, rng })
    }

    /// Generate the full dataset, company-major then year-ascending.
    pub fn generate(&mut self) -> Vec<TelecomRecord> {
        let mut records = Vec::with_capacity(self.config.expected_rows());
        let companies = self.config.companies.clone();

        for company in &companies {
            let mut state = self.open_company(company);
            debug!(
                company = %state.name,
                revenue = state.revenue,
                subscribers = state.subscribers,
                "Opening company state"
            );

            for year in self.config.years() {
                records.push(self.simulate_year(&mut state, year));
            }
        }

        info!(
            seed = self.config.seed,
            companies = companies.len(),
            rows = records.len(),
            "Dataset generated"
        );

        records
    }

    /// Sample the starting position of one company.
    fn open_company(&mut self, name: &str) -> CompanyState {
        let revenue = self.rng.gen_range(self.config.initial_revenue.clone());
        let subscribers = self.rng.gen_range(self.config.initial_subscribers.clone());
        let market_share_pct = self.rng.gen_range(self.config.market_share_pct.clone());

        CompanyState {
            name: name.to_string(),
            revenue: revenue as f64,
            subscribers: subscribers as f64,
            market_share_pct,
        }
    }

    /// Advance one company by a year and emit its row.
    fn simulate_year(&mut self, state: &mut CompanyState, year: i32) -> TelecomRecord {
        state.revenue += self.rng.gen_range(self.config.revenue_increment.clone()) as f64;
        state.subscribers += self.rng.gen_range(self.config.subscriber_increment.clone());
        let churn = self.rng.gen_range(self.config.churn_pct.clone());

        let operating_cost = state.revenue * self.rng.gen_range(self.config.cost_ratio.clone());
        let profit = state.revenue - operating_cost;
        let ebitda_margin = profit / state.revenue * 100.0;
        let arpu = state.revenue / (state.subscribers * 1_000_000.0);

        let region = self.config.regions[self.rng.gen_range(0..self.config.regions.len())];
        let service_type =
            self.config.service_types[self.rng.gen_range(0..self.config.service_types.len())];

        TelecomRecord {
            year,
            company: state.name.clone(),
            region,
            service_type,
            revenue: round_to(state.revenue, 2),
            operating_cost: round_to(operating_cost, 2),
            profit: round_to(profit, 2),
            subscribers_millions: round_to(state.subscribers, 2),
            churn_rate: round_to(churn, 2),
            arpu: round_to(arpu, 6),
            market_share_pct: round_to(state.market_share_pct, 2),
            ebitda_margin_pct: round_to(ebitda_margin, 2),
        }
    }
}
