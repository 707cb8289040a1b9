//! Integration tests for the screensim simulation engine
//!
//! Tests are organized by topic:
//! - `end_to_end` - Cohort runs against closed-form expectations
//! - `reproducibility` - Seeding, parallel vs sequential agreement
//! - `sampler_distribution` - Goodness of fit of sampled waiting times
//! - `validation` - Every configuration error path
//! - `screening` - The screening model and its parameter generator

mod reproducibility;
mod screening;

use crate::config::{Parameters, ParametersBuilder};
use crate::model::StateId;

/// Well -> Dead at `rate` per year, `cost` per year while Well, no discounting
pub(crate) fn well_dead(rate: f64, cost: f64) -> Parameters {
    ParametersBuilder::from_rows(vec![vec![0.0, rate], vec![0.0, 0.0]])
        .unwrap()
        .state_names(["Well", "Dead"])
        .death_state(StateId(1))
        .annual_costs(vec![cost, 0.0])
        .annual_utilities(vec![1.0, 0.0])
        .build()
        .unwrap()
}
