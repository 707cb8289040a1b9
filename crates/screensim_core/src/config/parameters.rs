//! Immutable per-strategy parameter bundle

use serde::Serialize;

use crate::model::{RateMatrix, StateId};

/// A state whose entries are counted per individual (e.g. cancer onset)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedEvent {
    pub name: String,
    pub state: StateId,
}

/// Everything the engine needs to simulate one strategy.
///
/// Only `ParametersBuilder::build` creates this type, after validating it.
/// There is no mutating API: one instance is shared read-only by every
/// individual of a cohort, and by every cohort of the same strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameters {
    pub(super) state_names: Vec<String>,
    pub(super) death_states: Vec<bool>,
    pub(super) initial_state: StateId,
    pub(super) rate_matrix: RateMatrix,
    pub(super) annual_costs: Vec<f64>,
    pub(super) annual_utilities: Vec<f64>,
    pub(super) surcharges: Vec<f64>,
    pub(super) discount_rate: f64,
    pub(super) tracked_events: Vec<TrackedEvent>,
}

impl Parameters {
    pub fn num_states(&self) -> usize {
        self.rate_matrix.size()
    }

    pub fn state_name(&self, state: StateId) -> &str {
        &self.state_names[state.index()]
    }

    pub fn state_names(&self) -> &[String] {
        &self.state_names
    }

    pub fn initial_state(&self) -> StateId {
        self.initial_state
    }

    pub fn rate_matrix(&self) -> &RateMatrix {
        &self.rate_matrix
    }

    /// Death states end the trajectory and fix the survival time
    pub fn is_death_state(&self, state: StateId) -> bool {
        self.death_states[state.index()]
    }

    pub fn annual_cost(&self, state: StateId) -> f64 {
        self.annual_costs[state.index()]
    }

    pub fn annual_utility(&self, state: StateId) -> f64 {
        self.annual_utilities[state.index()]
    }

    /// Flat strategy-specific cost added while occupying `state`
    pub fn surcharge(&self, state: StateId) -> f64 {
        self.surcharges[state.index()]
    }

    /// Total cost accrued per year in `state`
    #[inline]
    pub fn cost_rate(&self, state: StateId) -> f64 {
        self.annual_costs[state.index()] + self.surcharges[state.index()]
    }

    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    pub fn tracked_events(&self) -> &[TrackedEvent] {
        &self.tracked_events
    }

    pub fn event_names(&self) -> Vec<String> {
        self.tracked_events.iter().map(|e| e.name.clone()).collect()
    }
}
