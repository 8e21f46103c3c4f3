//! TOML-loadable settings for the IRR root finder.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Root-finding settings shared by every IRR computation.
///
/// All fields have defaults. Load overrides from TOML with
/// [`SolverConfig::from_toml_file`]:
///
/// ```toml
/// max_iterations = 500
/// tolerance = 1e-9
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Iteration budget for each of the Newton and bisection phases.
    pub max_iterations: u32,
    /// Accepted |NPV| relative to the sum of absolute cash flows.
    pub tolerance: f64,
    /// Newton-Raphson starting rate.
    pub initial_guess: f64,
    /// Lowest rate searched by the bisection fallback (must be > -1).
    pub lower_bound: f64,
    /// Highest rate searched by the bisection fallback.
    pub upper_bound: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-7,
            initial_guess: 0.1,
            lower_bound: -0.99,
            upper_bound: 10.0,
        }
    }
}

/// Errors from loading or validating a [`SolverConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read solver config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse solver config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid solver config: {0}")]
    Invalid(String),
}

impl SolverConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid("max_iterations must be > 0".into()));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        if !(self.lower_bound > -1.0 && self.lower_bound < self.upper_bound) {
            return Err(ConfigError::Invalid(format!(
                "bounds must satisfy -1 < lower_bound < upper_bound, got [{}, {}]",
                self.lower_bound, self.upper_bound
            )));
        }
        if !self.upper_bound.is_finite() {
            return Err(ConfigError::Invalid("upper_bound must be finite".into()));
        }
        if !(self.initial_guess > -1.0 && self.initial_guess.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "initial_guess must be > -1, got {}",
                self.initial_guess
            )));
        }
        Ok(())
    }
}
