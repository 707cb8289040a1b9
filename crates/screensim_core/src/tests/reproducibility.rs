use std::sync::Arc;

use super::well_dead;
use crate::cohort::{Cohort, MultiCohort};
use crate::config::SimulationConfig;
use crate::model::{CohortId, PatientId};
use crate::patient::Patient;
use crate::screening::{Strategy, parameters_for};

#[test]
fn test_same_id_same_outcome() {
    let params = parameters_for(Strategy::Hpv).unwrap();
    for i in 0..20 {
        let id = PatientId::new(CohortId(3), i);
        let a = Patient::new(id, &params).simulate(80.0).unwrap();
        let b = Patient::new(id, &params).simulate(80.0).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let params = Arc::new(parameters_for(Strategy::Dual).unwrap());
    let config = SimulationConfig::new(400, 60.0);

    let parallel = Cohort::new(CohortId(1), config, Arc::clone(&params))
        .unwrap()
        .simulate()
        .unwrap();
    let sequential = Cohort::new(CohortId(1), config, params)
        .unwrap()
        .simulate_sequential()
        .unwrap();

    assert_eq!(parallel.survival_times, sequential.survival_times);
    assert_eq!(parallel.costs, sequential.costs);
    assert_eq!(parallel.utilities, sequential.utilities);
    assert_eq!(parallel.event_counts, sequential.event_counts);
    assert_eq!(parallel.metrics, sequential.metrics);
}

#[test]
fn test_cohort_order_is_patient_id_order() {
    let params = well_dead(0.3, 1.0);
    let config = SimulationConfig::new(50, 30.0);
    let out = Cohort::new(CohortId(2), config, Arc::new(params.clone()))
        .unwrap()
        .simulate()
        .unwrap();

    for (i, survival) in out.survival_times.iter().enumerate() {
        let solo = Patient::new(PatientId::new(CohortId(2), i as u32), &params)
            .simulate(30.0)
            .unwrap();
        assert_eq!(*survival, solo.survival);
    }
}

#[test]
fn test_multi_cohort_rerun_is_identical() {
    let config = SimulationConfig::new(100, 40.0);
    let run = || {
        MultiCohort::new(CohortId(0), 3, config)
            .unwrap()
            .simulate(|_| parameters_for(Strategy::Cytology))
            .unwrap()
            .1
    };
    let a = run();
    let b = run();
    assert_eq!(a.mean_costs, b.mean_costs);
    assert_eq!(a.mean_survival_times, b.mean_survival_times);
}
