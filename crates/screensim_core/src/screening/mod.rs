//! Cervical-cancer screening model
//!
//! Health states, the screening strategies being compared, and the
//! per-strategy `Parameters` the engine runs on. Everything here is data
//! preparation: the engine never looks at strategies directly.
//!
//! Screening is modelled as a short episode. A living individual is invited
//! at the strategy's screening rate, spends on average one week in the
//! matching `*Screening` state, and leaves it either detected (to treatment)
//! or missed (back to where they came from). The test cost is spread over
//! the episode so that one episode costs one test on average.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Parameters, ParametersBuilder};
use crate::error::ConfigError;
use crate::model::{RateMatrix, StateId};

mod generator;

pub use generator::{ParameterGenerator, parameter_rng};

// =============================================================================
// Natural history (rates per year)
// =============================================================================

/// Onset of precancerous lesions
pub const PRECANCER_ONSET_RATE: f64 = 0.02;
/// Spontaneous regression of precancerous lesions
pub const PRECANCER_REGRESSION_RATE: f64 = 0.10;
/// Progression from precancer to invasive cancer
pub const CANCER_PROGRESSION_RATE: f64 = 0.05;
/// Death from untreated cancer
pub const CANCER_MORTALITY_RATE: f64 = 0.15;
/// Background mortality, applied to every living state
pub const OTHER_MORTALITY_RATE: f64 = 0.012;

/// Exit rate of a screening episode (mean length one week)
pub const SCREENING_EPISODE_RATE: f64 = 52.0;
/// Exit rate of precancer treatment (mean length three months)
pub const PRECANCER_TREATMENT_EXIT_RATE: f64 = 4.0;
/// Cure while under cancer treatment
pub const CANCER_CURE_RATE: f64 = 0.4;
/// Death while under cancer treatment
pub const TREATED_CANCER_MORTALITY_RATE: f64 = 0.04;

// =============================================================================
// Costs and utilities
// =============================================================================

pub const DISCOUNT_RATE: f64 = 0.03;

/// Annual cost of living with invasive cancer
pub const CANCER_ANNUAL_COST: f64 = 5_000.0;
/// Annual cost of cancer treatment, on top of `CANCER_ANNUAL_COST`
pub const CANCER_TREATMENT_COST: f64 = 30_000.0;
/// Cost of one precancer treatment course
pub const PRECANCER_TREATMENT_COST: f64 = 1_200.0;

const HPV_TEST_COST: f64 = 60.0;
const CYTOLOGY_TEST_COST: f64 = 40.0;
const DUAL_TEST_COST: f64 = 95.0;

// =============================================================================
// Health states
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthState {
    Well,
    WellScreening,
    PreCancer,
    PreCancerScreening,
    PreCancerTreatment,
    Cancer,
    CancerScreening,
    CancerTreatment,
    CancerDeath,
    OtherDeath,
}

impl HealthState {
    /// All states in rate-matrix order
    pub const ALL: [HealthState; 10] = [
        HealthState::Well,
        HealthState::WellScreening,
        HealthState::PreCancer,
        HealthState::PreCancerScreening,
        HealthState::PreCancerTreatment,
        HealthState::Cancer,
        HealthState::CancerScreening,
        HealthState::CancerTreatment,
        HealthState::CancerDeath,
        HealthState::OtherDeath,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub fn id(self) -> StateId {
        StateId(self as u16)
    }

    pub fn is_death(self) -> bool {
        matches!(self, HealthState::CancerDeath | HealthState::OtherDeath)
    }

    pub fn name(self) -> &'static str {
        match self {
            HealthState::Well => "Well",
            HealthState::WellScreening => "Well (screening)",
            HealthState::PreCancer => "Precancer",
            HealthState::PreCancerScreening => "Precancer (screening)",
            HealthState::PreCancerTreatment => "Precancer treatment",
            HealthState::Cancer => "Cancer",
            HealthState::CancerScreening => "Cancer (screening)",
            HealthState::CancerTreatment => "Cancer treatment",
            HealthState::CancerDeath => "Cancer death",
            HealthState::OtherDeath => "Other death",
        }
    }

    fn annual_cost(self) -> f64 {
        match self {
            HealthState::Cancer | HealthState::CancerScreening | HealthState::CancerTreatment => {
                CANCER_ANNUAL_COST
            }
            _ => 0.0,
        }
    }

    fn annual_utility(self) -> f64 {
        match self {
            HealthState::Well | HealthState::WellScreening => 1.0,
            HealthState::PreCancer | HealthState::PreCancerScreening => 0.95,
            HealthState::PreCancerTreatment => 0.85,
            HealthState::Cancer | HealthState::CancerScreening => 0.60,
            HealthState::CancerTreatment => 0.50,
            HealthState::CancerDeath | HealthState::OtherDeath => 0.0,
        }
    }
}

// =============================================================================
// Strategies
// =============================================================================

/// Screening strategy under comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[serde(alias = "hpv_screen")]
    Hpv,
    #[serde(alias = "cytology_screen")]
    Cytology,
    #[serde(alias = "dual_screen")]
    Dual,
}

/// What distinguishes one strategy from another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreeningProfile {
    /// Invitations per year
    pub screening_rate: f64,
    /// Probability a screening episode detects existing disease
    pub sensitivity: f64,
    /// Cost of one test
    pub test_cost: f64,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Hpv, Strategy::Cytology, Strategy::Dual];

    pub fn profile(self) -> ScreeningProfile {
        match self {
            Strategy::Hpv => ScreeningProfile {
                screening_rate: 1.0 / 5.0,
                sensitivity: 0.90,
                test_cost: HPV_TEST_COST,
            },
            Strategy::Cytology => ScreeningProfile {
                screening_rate: 1.0 / 3.0,
                sensitivity: 0.55,
                test_cost: CYTOLOGY_TEST_COST,
            },
            Strategy::Dual => ScreeningProfile {
                screening_rate: 1.0 / 5.0,
                sensitivity: 0.95,
                test_cost: DUAL_TEST_COST,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Hpv => "HPV screening",
            Strategy::Cytology => "Cytology screening",
            Strategy::Dual => "Dual screening",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Strategy::Hpv => "hpv",
            Strategy::Cytology => "cytology",
            Strategy::Dual => "dual",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}' (expected one of: hpv, cytology, dual)")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hpv" | "hpv_screen" => Ok(Strategy::Hpv),
            "cytology" | "cyto" | "cytology_screen" => Ok(Strategy::Cytology),
            "dual" | "dual_screen" => Ok(Strategy::Dual),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

// =============================================================================
// Rate matrix and parameters
// =============================================================================

/// Transition rates under `strategy`. Death rows are all zero.
pub fn rate_matrix_for(strategy: Strategy) -> Result<RateMatrix, ConfigError> {
    use HealthState::*;

    let profile = strategy.profile();
    let detect = SCREENING_EPISODE_RATE * profile.sensitivity;
    let miss = SCREENING_EPISODE_RATE * (1.0 - profile.sensitivity);

    let mut rows = vec![vec![0.0; HealthState::COUNT]; HealthState::COUNT];
    let mut set = |from: HealthState, to: HealthState, rate: f64| {
        rows[from as usize][to as usize] += rate;
    };

    set(Well, PreCancer, PRECANCER_ONSET_RATE);
    set(Well, WellScreening, profile.screening_rate);
    set(WellScreening, Well, SCREENING_EPISODE_RATE);

    set(PreCancer, Well, PRECANCER_REGRESSION_RATE);
    set(PreCancer, Cancer, CANCER_PROGRESSION_RATE);
    set(PreCancer, PreCancerScreening, profile.screening_rate);
    set(PreCancerScreening, PreCancerTreatment, detect);
    set(PreCancerScreening, PreCancer, miss);
    set(PreCancerTreatment, Well, PRECANCER_TREATMENT_EXIT_RATE);

    set(Cancer, CancerDeath, CANCER_MORTALITY_RATE);
    set(Cancer, CancerScreening, profile.screening_rate);
    set(CancerScreening, CancerTreatment, detect);
    set(CancerScreening, Cancer, miss);
    set(CancerTreatment, Well, CANCER_CURE_RATE);
    set(CancerTreatment, CancerDeath, TREATED_CANCER_MORTALITY_RATE);

    for state in HealthState::ALL.into_iter().filter(|s| !s.is_death()) {
        set(state, OtherDeath, OTHER_MORTALITY_RATE);
    }

    RateMatrix::from_rows(rows)
}

/// Fresh parameter bundle for `strategy` with the base-case costs
pub fn parameters_for(strategy: Strategy) -> Result<Parameters, ConfigError> {
    let costs = HealthState::ALL.map(HealthState::annual_cost).to_vec();
    build_parameters(strategy, costs, strategy.profile().test_cost)
}

/// Shared by the base case and the probabilistic generator, which passes
/// sampled costs.
pub(crate) fn build_parameters(
    strategy: Strategy,
    annual_costs: Vec<f64>,
    test_cost: f64,
) -> Result<Parameters, ConfigError> {
    let utilities = HealthState::ALL.map(HealthState::annual_utility).to_vec();
    // Spread per-episode costs over the mean episode length
    let test_surcharge = test_cost * SCREENING_EPISODE_RATE;
    let precancer_treatment_surcharge = PRECANCER_TREATMENT_COST * PRECANCER_TREATMENT_EXIT_RATE;

    ParametersBuilder::new(rate_matrix_for(strategy)?)
        .state_names(HealthState::ALL.map(HealthState::name))
        .death_states(
            HealthState::ALL
                .into_iter()
                .filter(|s| s.is_death())
                .map(HealthState::id),
        )
        .initial_state(HealthState::Well.id())
        .annual_costs(annual_costs)
        .annual_utilities(utilities)
        .surcharge(HealthState::WellScreening.id(), test_surcharge)
        .surcharge(HealthState::PreCancerScreening.id(), test_surcharge)
        .surcharge(HealthState::CancerScreening.id(), test_surcharge)
        .surcharge(
            HealthState::PreCancerTreatment.id(),
            precancer_treatment_surcharge,
        )
        .surcharge(HealthState::CancerTreatment.id(), CANCER_TREATMENT_COST)
        .discount_rate(DISCOUNT_RATE)
        .track_event("cancer", HealthState::Cancer.id())
        .track_event("precancer_treatment", HealthState::PreCancerTreatment.id())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_ids_follow_declaration_order() {
        for (i, state) in HealthState::ALL.iter().enumerate() {
            assert_eq!(state.id(), StateId(i as u16));
        }
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("hpv".parse::<Strategy>(), Ok(Strategy::Hpv));
        assert_eq!(" Cytology ".parse::<Strategy>(), Ok(Strategy::Cytology));
        assert_eq!("DUAL_SCREEN".parse::<Strategy>(), Ok(Strategy::Dual));
        assert!("mri".parse::<Strategy>().is_err());
        for s in Strategy::ALL {
            assert_eq!(s.key().parse::<Strategy>(), Ok(s));
        }
    }

    #[test]
    fn test_screening_episode_rows() {
        let m = rate_matrix_for(Strategy::Cytology).unwrap();
        let from = HealthState::PreCancerScreening.id();
        let detect = m.rate(from, HealthState::PreCancerTreatment.id());
        let miss = m.rate(from, HealthState::PreCancer.id());
        assert!((detect + miss - SCREENING_EPISODE_RATE).abs() < 1e-12);
        assert!((detect / SCREENING_EPISODE_RATE - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_every_living_state_has_background_mortality() {
        let m = rate_matrix_for(Strategy::Hpv).unwrap();
        for state in HealthState::ALL {
            let rate = m.rate(state.id(), HealthState::OtherDeath.id());
            if state.is_death() {
                assert!(m.is_absorbing(state.id()));
            } else {
                assert_eq!(rate, OTHER_MORTALITY_RATE);
            }
        }
    }
}
