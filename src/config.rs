// src/config.rs
use crate::utils::error::AppError;

pub const EXPECTED_TOTAL_ENV: &str = "SYLLABUS_EXPECTED_TOTAL";
pub const WEIGHT_TOLERANCE_ENV: &str = "SYLLABUS_WEIGHT_TOLERANCE";

/// Tunables for the weight-sum check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub expected_total: u32,
    pub weight_tolerance: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            expected_total: 100,
            weight_tolerance: 5,
        }
    }
}

impl ParserConfig {
    /// Defaults overridden by `SYLLABUS_EXPECTED_TOTAL` / `SYLLABUS_WEIGHT_TOLERANCE` when set.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(EXPECTED_TOTAL_ENV) {
            config.expected_total = parse_env_value(EXPECTED_TOTAL_ENV, &value)?;
            tracing::debug!("Using {} = {}", EXPECTED_TOTAL_ENV, config.expected_total);
        }
        if let Some(value) = lookup(WEIGHT_TOLERANCE_ENV) {
            config.weight_tolerance = parse_env_value(WEIGHT_TOLERANCE_ENV, &value)?;
            tracing::debug!("Using {} = {}", WEIGHT_TOLERANCE_ENV, config.weight_tolerance);
        }
        Ok(config)
    }

    pub fn with_expected_total(mut self, expected_total: u32) -> Self {
        self.expected_total = expected_total;
        self
    }

    pub fn with_weight_tolerance(mut self, weight_tolerance: u32) -> Self {
        self.weight_tolerance = weight_tolerance;
        self
    }
}

fn parse_env_value(key: &str, value: &str) -> Result<u32, AppError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|e| AppError::Config(format!("Invalid value '{}' for {}: {}", value, key, e)))
}
