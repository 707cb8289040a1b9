//! Probabilistic parameter sets for replicated cohorts.
//!
//! Each nonzero annual state cost and the strategy's test cost are drawn
//! from a Gamma distribution fitted by the method of moments, with a
//! standard deviation of one fifth of the base-case mean. Every call to
//! `sample` builds a fresh `Parameters`; the base-case tables are never
//! touched.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma};

use super::{HealthState, Strategy, build_parameters};
use crate::config::Parameters;
use crate::error::ConfigError;
use crate::model::CohortId;

/// Coefficient of variation of every sampled cost
const COST_CV: f64 = 0.2;

/// Leading seed bytes of every parameter stream
const PARAMETER_SEED_TAG: [u8; 8] = *b"params\0\0";

/// Random stream for the parameter draw of `cohort`.
///
/// Patient streams are expanded from a `u64` id, parameter streams from a
/// full tagged seed, so the two never coincide even when a cohort id equals
/// a patient id.
pub fn parameter_rng(cohort: CohortId) -> StdRng {
    let mut seed = [0u8; 32];
    seed[..8].copy_from_slice(&PARAMETER_SEED_TAG);
    seed[8..12].copy_from_slice(&cohort.0.to_le_bytes());
    StdRng::from_seed(seed)
}

/// Cost that is either fixed at zero or Gamma distributed around its mean
#[derive(Debug, Clone)]
enum CostDistribution {
    Zero,
    Gamma(Gamma<f64>),
}

impl CostDistribution {
    fn fit(name: &str, mean: f64) -> Result<Self, ConfigError> {
        if mean == 0.0 {
            return Ok(CostDistribution::Zero);
        }
        // shape = (mean / sd)^2, scale = sd^2 / mean
        let sd = mean * COST_CV;
        let shape = (mean / sd).powi(2);
        let scale = sd * sd / mean;
        Gamma::new(shape, scale)
            .map(CostDistribution::Gamma)
            .map_err(|e| ConfigError::InvalidDistribution {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            CostDistribution::Zero => 0.0,
            CostDistribution::Gamma(g) => g.sample(rng),
        }
    }
}

/// Draws independent parameter sets for one strategy
#[derive(Debug, Clone)]
pub struct ParameterGenerator {
    strategy: Strategy,
    annual_costs: Vec<CostDistribution>,
    test_cost: CostDistribution,
}

impl ParameterGenerator {
    pub fn new(strategy: Strategy) -> Result<Self, ConfigError> {
        let annual_costs = HealthState::ALL
            .iter()
            .map(|&state| CostDistribution::fit(state.name(), state.annual_cost()))
            .collect::<Result<Vec<_>, _>>()?;
        let test_cost = CostDistribution::fit("test cost", strategy.profile().test_cost)?;

        Ok(Self {
            strategy,
            annual_costs,
            test_cost,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Parameters, ConfigError> {
        let annual_costs = self.annual_costs.iter().map(|d| d.sample(rng)).collect();
        let test_cost = self.test_cost.sample(rng);
        build_parameters(self.strategy, annual_costs, test_cost)
    }

    /// Draw the parameter set of `cohort` from its own stream
    pub fn sample_for_cohort(&self, cohort: CohortId) -> Result<Parameters, ConfigError> {
        self.sample(&mut parameter_rng(cohort))
    }
}
