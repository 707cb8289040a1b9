//! Simulation metrics collection for profiling and debugging
//!
//! Counters gathered while a cohort's outcomes are collected. They are cheap
//! to keep and are logged when a cohort finishes, which makes runaway
//! trajectories (a rate matrix with very fast cycles) easy to spot.

use serde::{Deserialize, Serialize};

use crate::model::PatientOutcome;

/// Metrics collected during simulation execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Individuals whose outcome was recorded
    pub patients: u64,
    /// State changes across all individuals
    pub transitions: u64,
    /// Individuals that ended in a death state
    pub deaths: u64,
    /// Individuals still alive at the horizon
    pub censored: u64,
    /// Longest single trajectory, in state changes
    pub max_transitions: u32,
}

impl SimulationMetrics {
    /// Create empty metrics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished individual
    pub fn record_patient(&mut self, outcome: &PatientOutcome) {
        self.patients += 1;
        self.transitions += u64::from(outcome.transitions);
        self.max_transitions = self.max_transitions.max(outcome.transitions);
        if outcome.survival.is_censored() {
            self.censored += 1;
        } else {
            self.deaths += 1;
        }
    }

    /// Fold another cohort's counters into these
    pub fn merge(&mut self, other: &SimulationMetrics) {
        self.patients += other.patients;
        self.transitions += other.transitions;
        self.deaths += other.deaths;
        self.censored += other.censored;
        self.max_transitions = self.max_transitions.max(other.max_transitions);
    }

    /// Get average state changes per individual
    #[must_use]
    pub fn avg_transitions_per_patient(&self) -> f64 {
        if self.patients == 0 {
            0.0
        } else {
            self.transitions as f64 / self.patients as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PatientId, StateId, SurvivalTime};

    fn outcome(survival: SurvivalTime, transitions: u32) -> PatientOutcome {
        PatientOutcome {
            patient_id: PatientId(0),
            survival,
            elapsed: survival.time(),
            final_state: StateId(0),
            event_counts: Vec::new(),
            discounted_cost: 0.0,
            discounted_utility: 0.0,
            transitions,
        }
    }

    #[test]
    fn test_metrics_basic() {
        let mut metrics = SimulationMetrics::new();
        metrics.record_patient(&outcome(SurvivalTime::Observed(3.0), 4));
        metrics.record_patient(&outcome(SurvivalTime::Censored(50.0), 2));
        metrics.record_patient(&outcome(SurvivalTime::Observed(1.0), 0));

        assert_eq!(metrics.patients, 3);
        assert_eq!(metrics.transitions, 6);
        assert_eq!(metrics.deaths, 2);
        assert_eq!(metrics.censored, 1);
        assert_eq!(metrics.max_transitions, 4);
        assert_eq!(metrics.avg_transitions_per_patient(), 2.0);
    }

    #[test]
    fn test_metrics_merge() {
        let mut a = SimulationMetrics::new();
        a.record_patient(&outcome(SurvivalTime::Observed(3.0), 5));
        let mut b = SimulationMetrics::new();
        b.record_patient(&outcome(SurvivalTime::Censored(9.0), 7));

        a.merge(&b);
        assert_eq!(a.patients, 2);
        assert_eq!(a.transitions, 12);
        assert_eq!(a.max_transitions, 7);
        assert_eq!(a.deaths, 1);
        assert_eq!(a.censored, 1);
    }

    #[test]
    fn test_avg_transitions_empty() {
        assert_eq!(SimulationMetrics::new().avg_transitions_per_patient(), 0.0);
    }
}
