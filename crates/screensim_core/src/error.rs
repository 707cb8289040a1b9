use thiserror::Error;

use crate::model::{CohortId, PatientId, StateId};

/// Errors raised while assembling parameters or simulation settings.
///
/// All of these are detected before any individual is simulated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("rate matrix is not square: row {row} has {len} entries, expected {expected}")]
    NonSquareMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("rate matrix has no states")]
    EmptyMatrix,
    #[error("rate matrix has {states} states, at most {max} are supported")]
    TooManyStates { states: usize, max: usize },
    #[error("invalid transition rate {rate} from {from} to {to}")]
    InvalidRate { from: StateId, to: StateId, rate: f64 },
    #[error("outgoing rates of {state} sum to {total}")]
    InfiniteTotalRate { state: StateId, total: f64 },
    #[error("initial {0} is a death state")]
    InitialStateIsDeath(StateId),
    #[error("death state {state} has nonzero outgoing rate {rate} to {to}")]
    AbsorbingStateHasExit { state: StateId, to: StateId, rate: f64 },
    #[error("{field} has {len} entries but the model has {expected} states")]
    LengthMismatch {
        field: &'static str,
        len: usize,
        expected: usize,
    },
    #[error("{field} for {state} is not finite ({value})")]
    NonFiniteValue {
        field: &'static str,
        state: StateId,
        value: f64,
    },
    #[error("{state} is out of range for a model with {states} states")]
    StateOutOfRange { state: StateId, states: usize },
    #[error("discount rate must be finite and non-negative, got {0}")]
    InvalidDiscountRate(f64),
    #[error("simulation horizon must be finite and positive, got {0}")]
    InvalidHorizon(f64),
    #[error("population size must be positive")]
    EmptyPopulation,
    #[error("population size {0} exceeds the per-cohort id range")]
    PopulationTooLarge(usize),
    #[error("at least one cohort is required")]
    NoCohorts,
    #[error("invalid distribution for {name}: {reason}")]
    InvalidDistribution { name: String, reason: String },
}

/// Bookkeeping rule broken by a monitor update
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MonitorError {
    #[error("transition recorded at {time} before last recording at {last}")]
    TimeReversed { time: f64, last: f64 },
    #[error("survival time recorded twice")]
    SurvivalRecordedTwice,
    #[error("transition recorded after entering a death state")]
    UpdateAfterDeath,
}

/// Errors raised while simulating.
///
/// An invariant violation is a programming error in the model or engine, not
/// a recoverable per-individual condition: it aborts the whole run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invariant violated for {patient} in {state}: {reason}")]
    InvariantViolation {
        patient: PatientId,
        state: StateId,
        reason: String,
    },
    #[error("{cohort}: {source}")]
    Config {
        cohort: CohortId,
        #[source]
        source: ConfigError,
    },
}

pub type Result<T> = std::result::Result<T, SimulationError>;
