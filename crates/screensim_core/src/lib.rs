//! Continuous-time health-state simulation library
//!
//! This crate simulates cohorts of individuals moving among discrete health
//! states according to a transition-rate matrix, and aggregates their
//! discounted costs, health utilities and survival into statistics used to
//! compare screening strategies. It provides:
//! - Exact-event (Gillespie) sampling of a continuous-time Markov chain
//! - Per-individual state, event, cost and utility bookkeeping with
//!   continuous discounting
//! - Right-censoring at the observation horizon
//! - Cohort and multi-cohort simulation, parallel with the `parallel` feature
//! - Summary statistics with confidence and prediction intervals, and a
//!   population survival curve
//! - A cervical-cancer screening model with three strategies
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use screensim_core::cohort::Cohort;
//! use screensim_core::config::{ParametersBuilder, SimulationConfig};
//! use screensim_core::model::{CohortId, StateId};
//!
//! let params = ParametersBuilder::from_rows(vec![vec![0.0, 0.1], vec![0.0, 0.0]])
//!     .unwrap()
//!     .death_state(StateId(1))
//!     .annual_costs(vec![100.0, 0.0])
//!     .build()
//!     .unwrap();
//!
//! let cohort = Cohort::new(CohortId(0), SimulationConfig::new(500, 50.0), Arc::new(params)).unwrap();
//! let outcomes = cohort.simulate().unwrap();
//! assert_eq!(outcomes.survival_times.len(), 500);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod cohort;
pub mod discount;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod patient;
pub mod sampler;
pub mod screening;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

pub use cohort::{Cohort, MultiCohort};
pub use config::{Parameters, ParametersBuilder, SimulationConfig};
pub use error::{ConfigError, MonitorError, SimulationError};
pub use model::{CohortId, CohortOutcomes, MultiCohortOutcomes, PatientId, StateId};
