//! # Telecom Strategic Performance - Domain Model
//!
//! Core records, enums and forecast value objects shared by the simulator,
//! the analytics store, the trend forecaster and the pipeline binary.
//! These types are the single source of truth across all layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// ENUMS
// =============================================================================

/// Sales regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownRegion(s.to_string()))
    }
}

/// Subscription billing model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    Prepaid,
    Postpaid,
}

impl ServiceType {
    pub const ALL: [Self; 2] = [Self::Prepaid, Self::Postpaid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prepaid => "Prepaid",
            Self::Postpaid => "Postpaid",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownServiceType(s.to_string()))
    }
}

// =============================================================================
// ENTITY TYPES
// =============================================================================

/// One company-year row of the synthetic telecom dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelecomRecord {
    pub year: i32,
    pub company: String,
    pub region: Region,
    pub service_type: ServiceType,

    // Financials
    pub revenue: f64,
    pub operating_cost: f64,
    pub profit: f64,

    // Customer base
    pub subscribers_millions: f64,
    pub churn_rate: f64,
    pub arpu: f64,

    // Market position
    pub market_share_pct: f64,
    pub ebitda_margin_pct: f64,
}

impl TelecomRecord {
    /// Revenue as an observation of the company's revenue series
    #[must_use]
    pub fn revenue_observation(&self) -> Observation {
        Observation::new(&self.company, self.year, self.revenue)
    }
}

/// Record after ETL, carrying the derived growth columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    #[serde(flatten)]
    pub record: TelecomRecord,
    pub revenue_growth_pct: f64,
    pub subscriber_growth_pct: f64,
}

// =============================================================================
// FORECAST VALUE OBJECTS
// =============================================================================

/// One (period, value) data point of a tracked entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub entity_id: String,
    pub period: i32,
    pub value: f64,
}

impl Observation {
    pub fn new(entity_id: impl Into<String>, period: i32, value: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            period,
            value,
        }
    }
}

/// Predicted value of an entity's metric at a future period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub entity_id: String,
    pub period: i32,
    pub predicted_value: f64,
}

// =============================================================================
// HELPERS
// =============================================================================

/// Round to a fixed number of decimal places, ties to even
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Unknown service type: {0}")]
    UnknownServiceType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> TelecomRecord {
        TelecomRecord {
            year: 2016,
            company: "Telecom_A".to_string(),
            region: Region::East,
            service_type: ServiceType::Postpaid,
            revenue: 25_000.0,
            operating_cost: 15_000.0,
            profit: 10_000.0,
            subscribers_millions: 12.5,
            churn_rate: 7.25,
            arpu: 0.002,
            market_share_pct: 31.4,
            ebitda_margin_pct: 40.0,
        }
    }

    #[test]
    fn test_region_parse() {
        assert_eq!("north".parse::<Region>().unwrap(), Region::North);
        assert_eq!(" West ".parse::<Region>().unwrap(), Region::West);
        assert!(matches!(
            "Central".parse::<Region>(),
            Err(DomainError::UnknownRegion(_))
        ));
    }

    #[test]
    fn test_service_type_parse() {
        assert_eq!("Prepaid".parse::<ServiceType>().unwrap(), ServiceType::Prepaid);
        assert!("Hybrid".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_revenue_observation() {
        let obs = sample_record().revenue_observation();
        assert_eq!(obs.entity_id, "Telecom_A");
        assert_eq!(obs.period, 2016);
        assert_eq!(obs.value, 25_000.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1234.5678, 2), 1234.57);
        assert_eq!(round_to(-0.125_000_1, 2), -0.13);
        assert_eq!(round_to(0.000_123_456_7, 6), 0.000_123);
    }

    #[test]
    fn test_round_to_ties_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(-0.375, 2), -0.38);
    }

    #[test]
    fn test_cleaned_record_serializes_flat() {
        let cleaned = CleanedRecord {
            record: sample_record(),
            revenue_growth_pct: 0.0,
            subscriber_growth_pct: 0.0,
        };
        let json = serde_json::to_value(&cleaned).unwrap();
        assert_eq!(json["company"], "Telecom_A");
        assert_eq!(json["revenue_growth_pct"], 0.0);
    }
}
