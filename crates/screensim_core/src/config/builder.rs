//! Parameters Builder
//!
//! The ParametersBuilder provides a fluent API for assembling a validated,
//! immutable `Parameters` bundle.
//!
//! # Example
//!
//! ```
//! use screensim_core::config::ParametersBuilder;
//! use screensim_core::model::{RateMatrix, StateId};
//!
//! let matrix = RateMatrix::from_rows(vec![
//!     vec![0.0, 0.1],
//!     vec![0.0, 0.0],
//! ])
//! .unwrap();
//!
//! let params = ParametersBuilder::new(matrix)
//!     .state_names(["Well", "Dead"])
//!     .death_state(StateId(1))
//!     .annual_costs(vec![100.0, 0.0])
//!     .annual_utilities(vec![1.0, 0.0])
//!     .discount_rate(0.03)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.state_name(StateId(0)), "Well");
//! ```

use super::parameters::{Parameters, TrackedEvent};
use crate::error::ConfigError;
use crate::model::{RateMatrix, StateId};

/// Builder for `Parameters`; all checks run in `build`
#[derive(Debug, Clone)]
pub struct ParametersBuilder {
    rate_matrix: RateMatrix,
    state_names: Option<Vec<String>>,
    death_states: Vec<StateId>,
    initial_state: StateId,
    annual_costs: Option<Vec<f64>>,
    annual_utilities: Option<Vec<f64>>,
    surcharges: Vec<(StateId, f64)>,
    discount_rate: f64,
    allow_negative_discount: bool,
    tracked_events: Vec<TrackedEvent>,
}

impl ParametersBuilder {
    /// Start from a rate matrix. Costs and utilities default to zero, the
    /// initial state to the first state, the discount rate to zero.
    #[must_use]
    pub fn new(rate_matrix: RateMatrix) -> Self {
        Self {
            rate_matrix,
            state_names: None,
            death_states: Vec::new(),
            initial_state: StateId(0),
            annual_costs: None,
            annual_utilities: None,
            surcharges: Vec::new(),
            discount_rate: 0.0,
            allow_negative_discount: false,
            tracked_events: Vec::new(),
        }
    }

    /// Start from raw rows
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        RateMatrix::from_rows(rows).map(Self::new)
    }

    // =========================================================================
    // State space
    // =========================================================================

    #[must_use]
    pub fn state_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Mark a state as death (absorbing); its rate row must be all zero
    #[must_use]
    pub fn death_state(mut self, state: StateId) -> Self {
        self.death_states.push(state);
        self
    }

    #[must_use]
    pub fn death_states(mut self, states: impl IntoIterator<Item = StateId>) -> Self {
        self.death_states.extend(states);
        self
    }

    #[must_use]
    pub fn initial_state(mut self, state: StateId) -> Self {
        self.initial_state = state;
        self
    }

    /// Count entries into `state` under `name`
    #[must_use]
    pub fn track_event(mut self, name: impl Into<String>, state: StateId) -> Self {
        self.tracked_events.push(TrackedEvent {
            name: name.into(),
            state,
        });
        self
    }

    // =========================================================================
    // Rewards
    // =========================================================================

    #[must_use]
    pub fn annual_costs(mut self, costs: Vec<f64>) -> Self {
        self.annual_costs = Some(costs);
        self
    }

    #[must_use]
    pub fn annual_utilities(mut self, utilities: Vec<f64>) -> Self {
        self.annual_utilities = Some(utilities);
        self
    }

    /// Add a flat cost per year of occupying `state` (test or treatment
    /// cost). Repeated calls for the same state accumulate.
    #[must_use]
    pub fn surcharge(mut self, state: StateId, amount: f64) -> Self {
        self.surcharges.push((state, amount));
        self
    }

    #[must_use]
    pub fn discount_rate(mut self, rate: f64) -> Self {
        self.discount_rate = rate;
        self
    }

    /// Accept a negative discount rate (off by default)
    #[must_use]
    pub fn allow_negative_discount(mut self, allow: bool) -> Self {
        self.allow_negative_discount = allow;
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    pub fn build(self) -> Result<Parameters, ConfigError> {
        let n = self.rate_matrix.size();
        let check_state = |state: StateId| {
            if state.index() < n {
                Ok(state)
            } else {
                Err(ConfigError::StateOutOfRange { state, states: n })
            }
        };

        let state_names = match self.state_names {
            Some(names) => {
                check_len("state_names", names.len(), n)?;
                names
            }
            None => (0..n).map(|i| format!("S{i}")).collect(),
        };

        let annual_costs = self.annual_costs.unwrap_or_else(|| vec![0.0; n]);
        check_len("annual_costs", annual_costs.len(), n)?;
        check_finite("annual_costs", &annual_costs)?;

        let annual_utilities = self.annual_utilities.unwrap_or_else(|| vec![0.0; n]);
        check_len("annual_utilities", annual_utilities.len(), n)?;
        check_finite("annual_utilities", &annual_utilities)?;

        let mut surcharges = vec![0.0; n];
        for (state, amount) in self.surcharges {
            let state = check_state(state)?;
            if !amount.is_finite() {
                return Err(ConfigError::NonFiniteValue {
                    field: "surcharge",
                    state,
                    value: amount,
                });
            }
            surcharges[state.index()] += amount;
        }

        let initial_state = check_state(self.initial_state)?;

        let mut death_states = vec![false; n];
        for state in self.death_states {
            let state = check_state(state)?;
            if let Some((to, rate)) = self.rate_matrix.first_exit(state) {
                return Err(ConfigError::AbsorbingStateHasExit { state, to, rate });
            }
            death_states[state.index()] = true;
        }
        if death_states[initial_state.index()] {
            return Err(ConfigError::InitialStateIsDeath(initial_state));
        }

        for event in &self.tracked_events {
            check_state(event.state)?;
        }

        let rate = self.discount_rate;
        if !rate.is_finite() || (rate < 0.0 && !self.allow_negative_discount) {
            return Err(ConfigError::InvalidDiscountRate(rate));
        }

        Ok(Parameters {
            state_names,
            death_states,
            initial_state,
            rate_matrix: self.rate_matrix,
            annual_costs,
            annual_utilities,
            surcharges,
            discount_rate: rate,
            tracked_events: self.tracked_events,
        })
    }
}

fn check_len(field: &'static str, len: usize, expected: usize) -> Result<(), ConfigError> {
    if len == expected {
        Ok(())
    } else {
        Err(ConfigError::LengthMismatch {
            field,
            len,
            expected,
        })
    }
}

fn check_finite(field: &'static str, values: &[f64]) -> Result<(), ConfigError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(ConfigError::NonFiniteValue {
            field,
            state: StateId(i as u16),
            value: values[i],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state() -> ParametersBuilder {
        ParametersBuilder::from_rows(vec![vec![0.0, 0.1], vec![0.0, 0.0]])
            .unwrap()
            .death_state(StateId(1))
    }

    #[test]
    fn test_defaults() {
        let params = two_state().build().unwrap();
        assert_eq!(params.state_name(StateId(1)), "S1");
        assert_eq!(params.initial_state(), StateId(0));
        assert_eq!(params.cost_rate(StateId(0)), 0.0);
        assert!(params.is_death_state(StateId(1)));
        assert!(!params.is_death_state(StateId(0)));
    }

    #[test]
    fn test_surcharges_accumulate() {
        let params = two_state()
            .annual_costs(vec![100.0, 0.0])
            .surcharge(StateId(0), 20.0)
            .surcharge(StateId(0), 5.0)
            .build()
            .unwrap();
        assert_eq!(params.annual_cost(StateId(0)), 100.0);
        assert_eq!(params.surcharge(StateId(0)), 25.0);
        assert_eq!(params.cost_rate(StateId(0)), 125.0);
    }

    #[test]
    fn test_death_state_with_exit_rejected() {
        let err = ParametersBuilder::from_rows(vec![vec![0.0, 0.1], vec![0.2, 0.0]])
            .unwrap()
            .death_state(StateId(1))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::AbsorbingStateHasExit {
                state: StateId(1),
                to: StateId(0),
                rate: 0.2
            }
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = two_state().annual_costs(vec![1.0]).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::LengthMismatch {
                field: "annual_costs",
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_utility_rejected() {
        let err = two_state()
            .annual_utilities(vec![f64::INFINITY, 0.0])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonFiniteValue { .. }));
    }

    #[test]
    fn test_state_out_of_range_rejected() {
        let err = two_state().initial_state(StateId(7)).build().unwrap_err();
        assert_eq!(
            err,
            ConfigError::StateOutOfRange {
                state: StateId(7),
                states: 2
            }
        );
        let err = two_state().track_event("x", StateId(2)).build().unwrap_err();
        assert!(matches!(err, ConfigError::StateOutOfRange { .. }));
    }

    #[test]
    fn test_negative_discount_needs_opt_in() {
        assert_eq!(
            two_state().discount_rate(-0.01).build().unwrap_err(),
            ConfigError::InvalidDiscountRate(-0.01)
        );
        let params = two_state()
            .discount_rate(-0.01)
            .allow_negative_discount(true)
            .build()
            .unwrap();
        assert_eq!(params.discount_rate(), -0.01);
    }
}
