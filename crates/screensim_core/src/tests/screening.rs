use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cohort::{Cohort, MultiCohort};
use crate::config::SimulationConfig;
use crate::model::{CohortId, SurvivalTime};
use crate::screening::{
    DISCOUNT_RATE, HealthState, ParameterGenerator, Strategy, parameters_for, rate_matrix_for,
};

#[test]
fn test_every_strategy_builds() {
    for strategy in Strategy::ALL {
        let params = parameters_for(strategy).unwrap();
        assert_eq!(params.num_states(), HealthState::COUNT);
        assert_eq!(params.initial_state(), HealthState::Well.id());
        assert_eq!(params.discount_rate(), DISCOUNT_RATE);
        assert_eq!(params.event_names(), vec!["cancer", "precancer_treatment"]);

        for state in HealthState::ALL {
            assert_eq!(params.is_death_state(state.id()), state.is_death());
            assert_eq!(params.state_name(state.id()), state.name());
        }
    }
}

#[test]
fn test_death_rows_zero_and_living_rows_positive() {
    for strategy in Strategy::ALL {
        let m = rate_matrix_for(strategy).unwrap();
        for state in HealthState::ALL {
            if state.is_death() {
                assert_eq!(m.total_rate(state.id()), 0.0);
            } else {
                assert!(m.total_rate(state.id()) > 0.0, "{strategy}: {state:?}");
            }
        }
    }
}

#[test]
fn test_test_cost_charged_on_screening_states_only() {
    let params = parameters_for(Strategy::Hpv).unwrap();
    let test_cost = Strategy::Hpv.profile().test_cost;
    for state in [
        HealthState::WellScreening,
        HealthState::PreCancerScreening,
        HealthState::CancerScreening,
    ] {
        // Per-episode cost spread over a one-week mean stay
        assert_eq!(params.surcharge(state.id()), test_cost * 52.0);
    }
    assert_eq!(params.surcharge(HealthState::Well.id()), 0.0);
    assert!(params.surcharge(HealthState::CancerTreatment.id()) > 0.0);
}

#[test]
fn test_screening_cohort_runs() {
    let params = Arc::new(parameters_for(Strategy::Cytology).unwrap());
    let out = Cohort::new(CohortId(0), SimulationConfig::new(300, 100.0), params)
        .unwrap()
        .simulate()
        .unwrap();

    assert_eq!(out.survival_times.len(), 300);
    assert!(out.stat_cost.mean > 0.0);
    // Background mortality alone gives an expected lifetime of 83 years
    assert!(out.stat_survival_time.mean > 30.0);
    assert!(out.stat_utility.mean > 0.0);
    for (i, s) in out.survival_times.iter().enumerate() {
        if let SurvivalTime::Censored(t) = s {
            assert_eq!(*t, 100.0, "patient {i}");
        }
    }
    // Screening episodes dominate the transition count
    assert!(out.metrics.avg_transitions_per_patient() > 10.0);
}

#[test]
fn test_probabilistic_multi_cohort() {
    let generator = ParameterGenerator::new(Strategy::Hpv).unwrap();
    let multi = MultiCohort::new(CohortId(100), 5, SimulationConfig::new(50, 40.0)).unwrap();
    let (cohorts, summary) = multi
        .simulate(|id| {
            let mut rng = StdRng::seed_from_u64(u64::from(id.0));
            generator.sample(&mut rng)
        })
        .unwrap();

    assert_eq!(cohorts.len(), 5);
    assert_eq!(summary.len(), 5);
    assert_eq!(summary.stat_mean_cost.n, 5);
    let stat = &summary.stat_mean_cost;
    let pi = stat.prediction_interval(0.05);
    assert!(stat.min <= pi.lower && pi.lower <= pi.upper && pi.upper <= stat.max);
    assert!(stat.st_dev > 0.0);
}
