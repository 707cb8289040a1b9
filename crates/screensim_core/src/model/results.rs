//! Simulation results
//!
//! Per-individual outcomes, the collector that gathers them, and the
//! finalized cohort-level aggregate handed to reporting.

use serde::{Deserialize, Serialize};

use super::ids::{CohortId, PatientId, StateId};
use crate::metrics::SimulationMetrics;
use crate::stats::{SummaryStat, SurvivalCurve};

/// When an individual's observation ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SurvivalTime {
    /// Entered a death state at this time
    Observed(f64),
    /// Still alive when observation stopped at the horizon
    Censored(f64),
}

impl SurvivalTime {
    /// Observed or censoring time
    pub fn time(self) -> f64 {
        match self {
            SurvivalTime::Observed(t) | SurvivalTime::Censored(t) => t,
        }
    }

    pub fn is_censored(self) -> bool {
        matches!(self, SurvivalTime::Censored(_))
    }

    pub fn observed(self) -> Option<f64> {
        match self {
            SurvivalTime::Observed(t) => Some(t),
            SurvivalTime::Censored(_) => None,
        }
    }
}

/// Everything extracted from one simulated individual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientOutcome {
    pub patient_id: PatientId,
    pub survival: SurvivalTime,
    /// Simulated time at termination; never exceeds the horizon
    pub elapsed: f64,
    pub final_state: StateId,
    /// One count per tracked event, in `Parameters::tracked_events` order
    pub event_counts: Vec<u32>,
    pub discounted_cost: f64,
    pub discounted_utility: f64,
    pub transitions: u32,
}

/// Gathers patient outcomes in id order; consumed by `finalize`.
#[derive(Debug, Clone)]
pub struct OutcomeCollector {
    cohort_id: CohortId,
    event_names: Vec<String>,
    survival_times: Vec<SurvivalTime>,
    event_counts: Vec<Vec<u32>>,
    costs: Vec<f64>,
    utilities: Vec<f64>,
    metrics: SimulationMetrics,
}

impl OutcomeCollector {
    #[must_use]
    pub fn new(cohort_id: CohortId, event_names: Vec<String>, capacity: usize) -> Self {
        let event_counts = event_names
            .iter()
            .map(|_| Vec::with_capacity(capacity))
            .collect();
        Self {
            cohort_id,
            event_names,
            survival_times: Vec::with_capacity(capacity),
            event_counts,
            costs: Vec::with_capacity(capacity),
            utilities: Vec::with_capacity(capacity),
            metrics: SimulationMetrics::new(),
        }
    }

    pub fn extract(&mut self, outcome: &PatientOutcome) {
        self.survival_times.push(outcome.survival);
        for (series, &count) in self.event_counts.iter_mut().zip(&outcome.event_counts) {
            series.push(count);
        }
        self.costs.push(outcome.discounted_cost);
        self.utilities.push(outcome.discounted_utility);
        self.metrics.record_patient(outcome);
    }

    pub fn len(&self) -> usize {
        self.survival_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.survival_times.is_empty()
    }

    /// Compute summary statistics and the survival curve.
    #[must_use]
    pub fn finalize(self, initial_population_size: usize, horizon: f64) -> CohortOutcomes {
        let restricted: Vec<f64> = self.survival_times.iter().map(|s| s.time()).collect();
        let observed: Vec<f64> = self
            .survival_times
            .iter()
            .filter_map(|s| s.observed())
            .collect();

        let stat_event_counts = self
            .event_names
            .iter()
            .zip(&self.event_counts)
            .map(|(name, counts)| {
                let data: Vec<f64> = counts.iter().map(|&c| f64::from(c)).collect();
                SummaryStat::new(name.clone(), &data)
            })
            .collect();

        let survival_curve = SurvivalCurve::new(initial_population_size, horizon, &observed);

        CohortOutcomes {
            cohort_id: self.cohort_id,
            population_size: initial_population_size,
            horizon,
            stat_survival_time: SummaryStat::new("Survival time", &restricted),
            stat_observed_survival_time: SummaryStat::try_new("Survival time (deaths)", &observed),
            stat_event_counts,
            stat_cost: SummaryStat::new("Discounted cost", &self.costs),
            stat_utility: SummaryStat::new("Discounted utility", &self.utilities),
            survival_curve,
            event_names: self.event_names,
            survival_times: self.survival_times,
            event_counts: self.event_counts,
            costs: self.costs,
            utilities: self.utilities,
            metrics: self.metrics,
        }
    }
}

/// Finalized outcomes of one simulated cohort
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortOutcomes {
    pub cohort_id: CohortId,
    pub population_size: usize,
    pub horizon: f64,

    // === Per-individual vectors (patient-id order) ===
    pub survival_times: Vec<SurvivalTime>,
    pub event_names: Vec<String>,
    /// `event_counts[k][i]` = entries of individual `i` into tracked event `k`
    pub event_counts: Vec<Vec<u32>>,
    pub costs: Vec<f64>,
    pub utilities: Vec<f64>,

    // === Summaries ===
    /// Survival with censored individuals counted at the horizon
    /// (restricted mean survival)
    pub stat_survival_time: SummaryStat,
    /// Survival among individuals whose death was observed
    pub stat_observed_survival_time: Option<SummaryStat>,
    pub stat_event_counts: Vec<SummaryStat>,
    pub stat_cost: SummaryStat,
    pub stat_utility: SummaryStat,
    pub survival_curve: SurvivalCurve,
    pub metrics: SimulationMetrics,
}

impl CohortOutcomes {
    pub fn deaths(&self) -> usize {
        self.survival_times.iter().filter(|s| !s.is_censored()).count()
    }

    pub fn censored(&self) -> usize {
        self.survival_times.iter().filter(|s| s.is_censored()).count()
    }

    /// Restricted survival times (censored counted at the horizon)
    pub fn survival_values(&self) -> Vec<f64> {
        self.survival_times.iter().map(|s| s.time()).collect()
    }

    /// Counts for a tracked event by name
    pub fn event_series(&self, name: &str) -> Option<&[u32]> {
        self.event_names
            .iter()
            .position(|n| n == name)
            .map(|k| self.event_counts[k].as_slice())
    }
}

/// Per-cohort means across a set of independently parameterised cohorts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiCohortOutcomes {
    pub cohort_ids: Vec<CohortId>,
    pub mean_survival_times: Vec<f64>,
    pub mean_costs: Vec<f64>,
    pub mean_utilities: Vec<f64>,
    pub stat_mean_survival_time: SummaryStat,
    pub stat_mean_cost: SummaryStat,
    pub stat_mean_utility: SummaryStat,
    /// Engine counters summed over every cohort
    pub metrics: SimulationMetrics,
}

impl MultiCohortOutcomes {
    #[must_use]
    pub fn from_cohorts(cohorts: &[CohortOutcomes]) -> Self {
        let cohort_ids = cohorts.iter().map(|c| c.cohort_id).collect();
        let mean_survival_times: Vec<f64> =
            cohorts.iter().map(|c| c.stat_survival_time.mean).collect();
        let mean_costs: Vec<f64> = cohorts.iter().map(|c| c.stat_cost.mean).collect();
        let mean_utilities: Vec<f64> = cohorts.iter().map(|c| c.stat_utility.mean).collect();
        let metrics = cohorts
            .iter()
            .fold(SimulationMetrics::new(), |mut acc, c| {
                acc.merge(&c.metrics);
                acc
            });

        Self {
            stat_mean_survival_time: SummaryStat::new("Mean survival time", &mean_survival_times),
            stat_mean_cost: SummaryStat::new("Mean discounted cost", &mean_costs),
            stat_mean_utility: SummaryStat::new("Mean discounted utility", &mean_utilities),
            cohort_ids,
            mean_survival_times,
            mean_costs,
            mean_utilities,
            metrics,
        }
    }

    pub fn len(&self) -> usize {
        self.cohort_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohort_ids.is_empty()
    }
}
