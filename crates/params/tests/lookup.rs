//! Integration tests for parameter lookup across the store, schedule, and draws.

use rand::SeedableRng;
use rand::rngs::StdRng;

use iaso_params::{
    DirichletSpec, DistributionSpec, ParamError, ParamValue, ParameterSet, TimeSchedule, draw,
    draw_dirichlet,
};

#[test]
fn drawn_parameters_resolve_for_every_index() {
    let schedule = TimeSchedule::new(vec![0.0, 10.0]).unwrap();
    let n_samples = 20;
    let n_strata = 3;
    let mut params = ParameterSet::new(n_samples, n_strata, schedule).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);

    let p_progress = draw(
        "p_progress",
        &DistributionSpec::Beta {
            alpha: 5.0,
            beta: 45.0,
        },
        n_samples,
        n_strata,
        &mut rng,
    )
    .unwrap();
    params.register("p_progress", p_progress).unwrap();

    let cost = draw(
        "cost_sick",
        &DistributionSpec::Gamma {
            shape: 100.0,
            rate: 0.05,
        },
        n_samples,
        n_strata,
        &mut rng,
    )
    .unwrap();
    params.register("cost_sick", cost).unwrap();

    // Every (sample, stratum, interval) combination must be resolvable.
    for sample in 0..n_samples {
        for stratum in 0..n_strata {
            for interval in 0..2 {
                let p = params.get("p_progress", sample, stratum, interval).unwrap();
                assert!((0.0..=1.0).contains(&p));
                let c = params.get("cost_sick", sample, stratum, interval).unwrap();
                assert!(c > 0.0);
            }
        }
    }
}

#[test]
fn dirichlet_group_registers_as_coherent_row() {
    let n_samples = 50;
    let mut params = ParameterSet::new(n_samples, 1, TimeSchedule::single()).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    let spec = DirichletSpec {
        names: vec![
            "p_stay".to_string(),
            "p_progress".to_string(),
            "p_die".to_string(),
        ],
        alphas: vec![850.0, 100.0, 50.0],
    };
    for (name, value) in draw_dirichlet(&spec, n_samples, 1, &mut rng).unwrap() {
        params.register(&name, value).unwrap();
    }

    for sample in 0..n_samples {
        let total = params.get("p_stay", sample, 0, 0).unwrap()
            + params.get("p_progress", sample, 0, 0).unwrap()
            + params.get("p_die", sample, 0, 0).unwrap();
        assert!(
            (total - 1.0).abs() < 1e-12,
            "sample {sample}: dirichlet row sums to {total}"
        );
    }
}

#[test]
fn time_varying_lookup_switches_at_boundary() {
    let schedule = TimeSchedule::new(vec![0.0, 2.0]).unwrap();
    let mut params = ParameterSet::new(1, 1, schedule).unwrap();
    params
        .register_time_varying(
            "p_die",
            vec![ParamValue::Scalar(0.1), ParamValue::Scalar(0.4)],
        )
        .unwrap();

    assert_eq!(params.lookup_at("p_die", 0, 0, 1.99).unwrap(), 0.1);
    assert_eq!(params.lookup_at("p_die", 0, 0, 2.0).unwrap(), 0.4);
}

#[test]
fn lookup_failure_modes() {
    let mut params = ParameterSet::new(2, 2, TimeSchedule::new(vec![1.0]).unwrap()).unwrap();
    params.register("p", ParamValue::Scalar(0.5)).unwrap();

    assert!(matches!(
        params.get("q", 0, 0, 0),
        Err(ParamError::UnknownParameter { .. })
    ));
    assert!(matches!(
        params.get("p", 2, 0, 0),
        Err(ParamError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        params.lookup_at("p", 0, 0, 0.0),
        Err(ParamError::NoApplicableInterval { .. })
    ));
}
