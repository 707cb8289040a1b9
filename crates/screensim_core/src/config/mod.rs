//! Simulation configuration
//!
//! Two pieces of configuration drive a run:
//!
//! - `Parameters`: the per-strategy model (rates, rewards, discounting),
//!   assembled once with `ParametersBuilder` and immutable afterwards.
//! - `SimulationConfig`: how much to simulate (population size and
//!   observation horizon), shared by every strategy being compared.

use serde::{Deserialize, Serialize};

pub mod builder;
mod parameters;

pub use builder::ParametersBuilder;
pub use parameters::{Parameters, TrackedEvent};

use crate::error::ConfigError;

fn default_population_size() -> usize {
    1000
}

fn default_horizon() -> f64 {
    100.0
}

/// Size of a cohort and length of observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of individuals per cohort
    #[serde(default = "default_population_size")]
    pub population_size: usize,

    /// Observation horizon in years
    #[serde(default = "default_horizon")]
    pub horizon: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            horizon: default_horizon(),
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn new(population_size: usize, horizon: f64) -> Self {
        Self {
            population_size,
            horizon,
        }
    }

    /// Reject settings that would make a run meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if u32::try_from(self.population_size).is_err() {
            return Err(ConfigError::PopulationTooLarge(self.population_size));
        }
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(ConfigError::InvalidHorizon(self.horizon));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert_eq!(
            SimulationConfig::new(0, 10.0).validate(),
            Err(ConfigError::EmptyPopulation)
        );
        assert_eq!(
            SimulationConfig::new(10, 0.0).validate(),
            Err(ConfigError::InvalidHorizon(0.0))
        );
        assert_eq!(
            SimulationConfig::new(10, -5.0).validate(),
            Err(ConfigError::InvalidHorizon(-5.0))
        );
        assert!(SimulationConfig::new(10, f64::INFINITY).validate().is_err());
    }
}
