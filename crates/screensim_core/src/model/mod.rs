mod ids;
mod rate_matrix;
mod results;

pub use ids::{CohortId, PatientId, StateId};
pub use rate_matrix::RateMatrix;
pub use results::{
    CohortOutcomes, MultiCohortOutcomes, OutcomeCollector, PatientOutcome, SurvivalTime,
};
