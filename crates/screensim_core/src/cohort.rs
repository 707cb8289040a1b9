//! Cohort and multi-cohort simulation
//!
//! A cohort is a set of independent individuals sharing one parameter set.
//! Individuals never share state, so with the `parallel` feature they run on
//! the rayon pool; results are always collected in patient-id order and are
//! identical to a sequential run.

use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::{Parameters, SimulationConfig};
use crate::error::{ConfigError, Result, SimulationError};
use crate::model::{
    CohortId, CohortOutcomes, MultiCohortOutcomes, OutcomeCollector, PatientId, PatientOutcome,
};
use crate::patient::Patient;

/// A population simulated exactly once
#[derive(Debug, Clone)]
pub struct Cohort {
    id: CohortId,
    config: SimulationConfig,
    params: Arc<Parameters>,
}

impl Cohort {
    pub fn new(
        id: CohortId,
        config: SimulationConfig,
        params: Arc<Parameters>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { id, config, params })
    }

    pub fn id(&self) -> CohortId {
        self.id
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Simulate every individual and aggregate their outcomes.
    ///
    /// The first invariant violation aborts the cohort.
    pub fn simulate(self) -> Result<CohortOutcomes> {
        #[cfg(feature = "parallel")]
        let outcomes = self.run_parallel()?;
        #[cfg(not(feature = "parallel"))]
        let outcomes = self.run_sequential()?;

        Ok(self.aggregate(&outcomes))
    }

    /// Same as `simulate`, always on the calling thread
    pub fn simulate_sequential(self) -> Result<CohortOutcomes> {
        let outcomes = self.run_sequential()?;
        Ok(self.aggregate(&outcomes))
    }

    fn patient_ids(&self) -> impl Iterator<Item = PatientId> + use<> {
        let cohort = self.id;
        // validate() guarantees the population fits in u32
        (0..self.config.population_size as u32).map(move |i| PatientId::new(cohort, i))
    }

    #[cfg(feature = "parallel")]
    fn run_parallel(&self) -> Result<Vec<PatientOutcome>> {
        tracing::debug!(
            cohort = %self.id,
            population = self.config.population_size,
            threads = rayon::current_num_threads(),
            "simulating cohort"
        );
        let params = self.params.as_ref();
        let horizon = self.config.horizon;
        self.patient_ids()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|id| Patient::new(id, params).simulate(horizon))
            .collect()
    }

    fn run_sequential(&self) -> Result<Vec<PatientOutcome>> {
        tracing::debug!(
            cohort = %self.id,
            population = self.config.population_size,
            "simulating cohort sequentially"
        );
        let params = self.params.as_ref();
        self.patient_ids()
            .map(|id| Patient::new(id, params).simulate(self.config.horizon))
            .collect()
    }

    fn aggregate(&self, outcomes: &[PatientOutcome]) -> CohortOutcomes {
        let mut collector = OutcomeCollector::new(
            self.id,
            self.params.event_names(),
            self.config.population_size,
        );
        for outcome in outcomes {
            collector.extract(outcome);
        }
        let result = collector.finalize(self.config.population_size, self.config.horizon);

        tracing::debug!(
            cohort = %self.id,
            deaths = result.metrics.deaths,
            censored = result.metrics.censored,
            avg_transitions = result.metrics.avg_transitions_per_patient(),
            max_transitions = result.metrics.max_transitions,
            mean_survival = result.stat_survival_time.mean,
            "cohort finished"
        );
        result
    }
}

/// Several cohorts, each with its own parameter set.
///
/// Cohort ids run from `first_id` upward, so patient seeds never collide
/// across cohorts. Use a different `first_id` per strategy when strategies
/// should not share random streams; reuse it for common random numbers.
#[derive(Debug, Clone)]
pub struct MultiCohort {
    first_id: CohortId,
    n_cohorts: u32,
    config: SimulationConfig,
}

impl MultiCohort {
    pub fn new(
        first_id: CohortId,
        n_cohorts: u32,
        config: SimulationConfig,
    ) -> std::result::Result<Self, ConfigError> {
        if n_cohorts == 0 {
            return Err(ConfigError::NoCohorts);
        }
        config.validate()?;
        Ok(Self {
            first_id,
            n_cohorts,
            config,
        })
    }

    pub fn cohort_ids(&self) -> impl Iterator<Item = CohortId> + use<> {
        let first = self.first_id.0;
        (0..self.n_cohorts).map(move |k| CohortId(first.wrapping_add(k)))
    }

    /// Simulate every cohort with the parameters `make_params` returns for
    /// its id. Returns the individual cohort outcomes and their summary.
    pub fn simulate<F>(&self, make_params: F) -> Result<(Vec<CohortOutcomes>, MultiCohortOutcomes)>
    where
        F: Fn(CohortId) -> std::result::Result<Parameters, ConfigError> + Sync,
    {
        tracing::debug!(
            first = %self.first_id,
            cohorts = self.n_cohorts,
            "simulating multi-cohort"
        );

        let run_one = |id: CohortId| -> Result<CohortOutcomes> {
            let params = make_params(id)
                .map_err(|source| SimulationError::Config { cohort: id, source })?;
            let cohort = Cohort::new(id, self.config, Arc::new(params))
                .map_err(|source| SimulationError::Config { cohort: id, source })?;
            cohort.simulate()
        };

        #[cfg(feature = "parallel")]
        let cohorts: Vec<CohortOutcomes> = self
            .cohort_ids()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(run_one)
            .collect::<Result<_>>()?;
        #[cfg(not(feature = "parallel"))]
        let cohorts: Vec<CohortOutcomes> = self.cohort_ids().map(run_one).collect::<Result<_>>()?;

        let summary = MultiCohortOutcomes::from_cohorts(&cohorts);
        tracing::debug!(
            cohorts = summary.len(),
            patients = summary.metrics.patients,
            deaths = summary.metrics.deaths,
            censored = summary.metrics.censored,
            max_transitions = summary.metrics.max_transitions,
            "multi-cohort finished"
        );
        Ok((cohorts, summary))
    }
}
