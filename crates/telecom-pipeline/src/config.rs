//! # Pipeline Configuration
//!
//! Environment-based configuration for the pipeline binary. CLI flags
//! override these values.

use std::env;
use std::path::PathBuf;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory receiving every exported file
    pub output_dir: PathBuf,

    /// Seed of the dataset generator
    pub seed: u64,

    /// Number of years to project past the last observed year
    pub forecast_horizon: u32,

    /// Logging level
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            output_dir: lookup("TELECOM_OUTPUT_DIR")
                .map_or_else(|| PathBuf::from("output"), PathBuf::from),

            seed: lookup("TELECOM_SEED")
                .and_then(|v| v.parse().ok())
                .unwrap_or(42),

            forecast_horizon: lookup("TELECOM_FORECAST_HORIZON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            log_json: lookup("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.seed, 42);
        assert_eq!(config.forecast_horizon, 5);
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("TELECOM_OUTPUT_DIR", "/tmp/telecom"),
            ("TELECOM_SEED", "7"),
            ("TELECOM_FORECAST_HORIZON", "3"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "JSON"),
        ]));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/telecom"));
        assert_eq!(config.seed, 7);
        assert_eq!(config.forecast_horizon, 3);
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("TELECOM_SEED", "forty-two"),
            ("TELECOM_FORECAST_HORIZON", "-1"),
        ]));
        assert_eq!(config.seed, 42);
        assert_eq!(config.forecast_horizon, 5);
    }
}
