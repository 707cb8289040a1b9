//! Per-individual bookkeeping: health state, survival, event counts, and
//! discounted cost and utility.

use crate::config::Parameters;
use crate::discount::pv_continuous_payment;
use crate::error::MonitorError;
use crate::model::StateId;

/// Running discounted cost and utility of one individual.
///
/// Each update closes the interval `[t_last_recorded, time)` spent in the
/// state being left and integrates that state's reward rates over it.
#[derive(Debug, Clone)]
pub struct CostUtilityMonitor<'p> {
    params: &'p Parameters,
    t_last_recorded: f64,
    total_discounted_cost: f64,
    total_discounted_utility: f64,
}

impl<'p> CostUtilityMonitor<'p> {
    pub fn new(params: &'p Parameters) -> Self {
        Self {
            params,
            t_last_recorded: 0.0,
            total_discounted_cost: 0.0,
            total_discounted_utility: 0.0,
        }
    }

    /// Accrue rewards of `current_state` up to `time`
    pub fn update(&mut self, time: f64, current_state: StateId) -> Result<(), MonitorError> {
        if time < self.t_last_recorded {
            return Err(MonitorError::TimeReversed {
                time,
                last: self.t_last_recorded,
            });
        }

        let rate = self.params.discount_rate();
        let period = (self.t_last_recorded, time);

        self.total_discounted_cost += pv_continuous_payment(
            self.params.cost_rate(current_state),
            rate,
            period.0,
            period.1,
        );
        self.total_discounted_utility += pv_continuous_payment(
            self.params.annual_utility(current_state),
            rate,
            period.0,
            period.1,
        );

        self.t_last_recorded = time;
        Ok(())
    }

    pub fn t_last_recorded(&self) -> f64 {
        self.t_last_recorded
    }

    pub fn total_discounted_cost(&self) -> f64 {
        self.total_discounted_cost
    }

    pub fn total_discounted_utility(&self) -> f64 {
        self.total_discounted_utility
    }
}

/// Health state, survival time and tracked-event counters of one individual
#[derive(Debug, Clone)]
pub struct StateMonitor<'p> {
    params: &'p Parameters,
    current_state: StateId,
    survival_time: Option<f64>,
    event_counts: Vec<u32>,
    transitions: u32,
    cost_utility: CostUtilityMonitor<'p>,
}

impl<'p> StateMonitor<'p> {
    /// Start alive in the initial state
    pub fn new(params: &'p Parameters) -> Self {
        Self {
            params,
            current_state: params.initial_state(),
            survival_time: None,
            event_counts: vec![0; params.tracked_events().len()],
            transitions: 0,
            cost_utility: CostUtilityMonitor::new(params),
        }
    }

    /// Record that the individual is in `new_state` at `time`.
    ///
    /// `new_state == current` is how observation is closed at the horizon:
    /// only the final reward interval is accrued.
    pub fn update(&mut self, time: f64, new_state: StateId) -> Result<(), MonitorError> {
        if !self.is_alive() {
            return Err(MonitorError::UpdateAfterDeath);
        }

        self.cost_utility.update(time, self.current_state)?;

        if self.params.is_death_state(new_state) {
            if self.survival_time.is_some() {
                return Err(MonitorError::SurvivalRecordedTwice);
            }
            self.survival_time = Some(time);
        }

        if new_state != self.current_state {
            self.transitions += 1;
            for (count, event) in self
                .event_counts
                .iter_mut()
                .zip(self.params.tracked_events())
            {
                if event.state == new_state {
                    *count += 1;
                }
            }
        }

        self.current_state = new_state;
        Ok(())
    }

    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    /// Set once, on entry to a death state
    pub fn survival_time(&self) -> Option<f64> {
        self.survival_time
    }

    pub fn is_alive(&self) -> bool {
        !self.params.is_death_state(self.current_state)
    }

    pub fn event_counts(&self) -> &[u32] {
        &self.event_counts
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    pub fn cost_utility(&self) -> &CostUtilityMonitor<'p> {
        &self.cost_utility
    }
}
