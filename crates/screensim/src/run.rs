//! Simulating every selected strategy

use std::sync::Arc;

use color_eyre::eyre::WrapErr;

use screensim_core::cohort::{Cohort, MultiCohort};
use screensim_core::model::{CohortId, CohortOutcomes, MultiCohortOutcomes};
use screensim_core::screening::{ParameterGenerator, Strategy, parameters_for};

use crate::config::RunConfig;

/// Outcomes of one strategy
#[derive(Debug, Clone)]
pub struct StrategyRun {
    pub strategy: Strategy,
    /// One entry per cohort, cohort-id order
    pub cohorts: Vec<CohortOutcomes>,
    /// Across-cohort summary, present when more than one cohort ran
    pub summary: Option<MultiCohortOutcomes>,
}

impl StrategyRun {
    /// The cohort whose detailed outcomes are reported
    pub fn first_cohort(&self) -> &CohortOutcomes {
        &self.cohorts[0]
    }
}

/// Simulate every strategy in `config`, in order.
///
/// Every strategy uses the same cohort ids, so cohort `k` of one strategy
/// and cohort `k` of another share their individuals' random streams.
pub fn run(config: &RunConfig) -> color_eyre::Result<Vec<StrategyRun>> {
    config.validate()?;
    config
        .strategies
        .iter()
        .map(|&strategy| {
            run_strategy(config, strategy)
                .wrap_err_with(|| format!("simulating {}", strategy.name()))
        })
        .collect()
}

fn run_strategy(config: &RunConfig, strategy: Strategy) -> color_eyre::Result<StrategyRun> {
    tracing::info!(
        strategy = strategy.key(),
        cohorts = config.cohorts,
        population = config.population_size,
        horizon = config.horizon,
        probabilistic = config.probabilistic,
        "running strategy"
    );

    if config.cohorts == 1 && !config.probabilistic {
        let params = Arc::new(parameters_for(strategy)?);
        let outcomes = Cohort::new(CohortId(0), config.simulation(), params)?.simulate()?;
        return Ok(StrategyRun {
            strategy,
            cohorts: vec![outcomes],
            summary: None,
        });
    }

    let multi = MultiCohort::new(CohortId(0), config.cohorts, config.simulation())?;
    let (cohorts, summary) = if config.probabilistic {
        let generator = ParameterGenerator::new(strategy)?;
        multi.simulate(|id| generator.sample_for_cohort(id))?
    } else {
        multi.simulate(|_| parameters_for(strategy))?
    };

    let summary = (cohorts.len() > 1).then_some(summary);
    Ok(StrategyRun {
        strategy,
        cohorts,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RunConfig {
        RunConfig {
            strategies: vec![Strategy::Cytology, Strategy::Hpv],
            population_size: 60,
            horizon: 30.0,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_single_cohort_run() {
        let runs = run(&small_config()).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].strategy, Strategy::Cytology);
        assert_eq!(runs[1].strategy, Strategy::Hpv);
        for r in &runs {
            assert_eq!(r.cohorts.len(), 1);
            assert!(r.summary.is_none());
            assert_eq!(r.first_cohort().costs.len(), 60);
        }
    }

    #[test]
    fn test_probabilistic_multi_cohort_run() {
        let config = RunConfig {
            cohorts: 4,
            probabilistic: true,
            ..small_config()
        };
        let runs = run(&config).unwrap();
        for r in &runs {
            assert_eq!(r.cohorts.len(), 4);
            let summary = r.summary.as_ref().unwrap();
            assert_eq!(summary.mean_costs.len(), 4);
        }
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = RunConfig {
            population_size: 0,
            ..small_config()
        };
        assert!(run(&config).is_err());
    }
}
