//! One simulated individual.
//!
//! A patient walks the chain from the initial state, one sampled transition
//! at a time, until it enters a death state or the next transition would
//! land past the horizon. In the second case observation stops at the
//! horizon without a state change and the survival time is censored.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Parameters;
use crate::error::{MonitorError, SimulationError};
use crate::model::{PatientId, PatientOutcome, StateId, SurvivalTime};
use crate::monitor::StateMonitor;
use crate::sampler::{Gillespie, NextEvent};

#[derive(Debug)]
pub struct Patient<'p> {
    id: PatientId,
    params: &'p Parameters,
    rng: StdRng,
}

impl<'p> Patient<'p> {
    /// The random stream is seeded from `id`, so a patient is fully
    /// determined by its id and the parameters.
    pub fn new(id: PatientId, params: &'p Parameters) -> Self {
        Self {
            id,
            params,
            rng: StdRng::seed_from_u64(id.seed()),
        }
    }

    pub fn id(&self) -> PatientId {
        self.id
    }

    /// Run the trajectory to termination.
    ///
    /// `horizon` is assumed finite and positive (checked by
    /// `SimulationConfig::validate`).
    pub fn simulate(mut self, horizon: f64) -> Result<PatientOutcome, SimulationError> {
        let sampler = Gillespie::new(self.params.rate_matrix());
        let mut monitor = StateMonitor::new(self.params);
        let mut t = 0.0_f64;

        let survival = loop {
            let current = monitor.current_state();

            // A zero rate row is the only way a trajectory ends early
            match sampler.next_event(current, &mut self.rng) {
                NextEvent::Absorbing => match monitor.survival_time() {
                    Some(died_at) => break SurvivalTime::Observed(died_at),
                    None => {
                        // Zero row on a living state: nothing ever happens again
                        self.record(&mut monitor, horizon, current)?;
                        t = horizon;
                        break SurvivalTime::Censored(horizon);
                    }
                },
                NextEvent::Transition { dt, to } => {
                    if !(dt.is_finite() && dt > 0.0) {
                        return Err(self.violation(current, format!("sampled waiting time {dt}")));
                    }
                    if to == current {
                        return Err(self.violation(current, "sampled a self-transition".into()));
                    }
                    if !monitor.is_alive() {
                        return Err(self.violation(current, "death state has an exit".into()));
                    }

                    if t + dt > horizon {
                        self.record(&mut monitor, horizon, current)?;
                        t = horizon;
                        break SurvivalTime::Censored(horizon);
                    }

                    t += dt;
                    self.record(&mut monitor, t, to)?;
                }
            }
        };

        let cost_utility = monitor.cost_utility();
        let outcome = PatientOutcome {
            patient_id: self.id,
            survival,
            elapsed: t,
            final_state: monitor.current_state(),
            event_counts: monitor.event_counts().to_vec(),
            discounted_cost: cost_utility.total_discounted_cost(),
            discounted_utility: cost_utility.total_discounted_utility(),
            transitions: monitor.transitions(),
        };

        tracing::trace!(
            patient = %self.id,
            elapsed = outcome.elapsed,
            censored = survival.is_censored(),
            final_state = self.params.state_name(outcome.final_state),
            transitions = outcome.transitions,
            "patient finished"
        );

        Ok(outcome)
    }

    fn record(
        &self,
        monitor: &mut StateMonitor<'_>,
        time: f64,
        state: StateId,
    ) -> Result<(), SimulationError> {
        let current = monitor.current_state();
        monitor
            .update(time, state)
            .map_err(|e: MonitorError| self.violation(current, e.to_string()))
    }

    fn violation(&self, state: StateId, reason: String) -> SimulationError {
        tracing::error!(
            patient = %self.id,
            state = self.params.state_name(state),
            %reason,
            "simulation invariant violated"
        );
        SimulationError::InvariantViolation {
            patient: self.id,
            state,
            reason,
        }
    }
}
