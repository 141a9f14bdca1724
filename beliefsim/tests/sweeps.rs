use beliefsim::io::presets::{heterophily, homophily};
use beliefsim::sweep::{linspace, run_grid, AdmissionSweep, Axis, Execution, RateSweep, DEFAULT_SWEEP_PERIODS};
use beliefsim::{Belief, InitialConditions, ModelError, ParameterSet, Scenario, TransitionPolicy};

fn rate_sweep(steps: usize) -> RateSweep {
    RateSweep {
        base: ParameterSet::default()
            .with_influence(homophily())
            .with_policy(TransitionPolicy::TripleProduct),
        elder_step: 0.1,
        initial_conditions: InitialConditions::uniform([1.0 / 3.0; 3]),
        periods: 10,
        betas: linspace(0.0, 1.0, steps),
        beta_rets: linspace(0.0, 1.0, steps),
    }
}

#[test]
fn parallel_and_serial_sweeps_agree() {
    let sweep = rate_sweep(9);
    let serial = sweep.run(Execution::Serial).unwrap();
    let parallel = sweep.run(Execution::Parallel).unwrap();
    assert_eq!(serial, parallel);
    assert_eq!(serial.values.len(), 9);
    assert!(serial.values.iter().all(|r| r.len() == 9));
    assert!(serial.values.iter().flatten().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn each_cell_matches_a_standalone_run() {
    let sweep = rate_sweep(4);
    let grid = sweep.run(Execution::Parallel).unwrap();
    for (i, beta) in sweep.betas.iter().enumerate() {
        for (j, beta_ret) in sweep.beta_rets.iter().enumerate() {
            let alone = sweep.scenario(*beta, *beta_ret).run().unwrap();
            assert_eq!(grid.values[i][j], alone.final_mean(Belief::Committed).unwrap());
        }
    }
}

#[test]
fn first_failing_cell_is_reported() {
    let rows = Axis::new("p_CS", vec![0.5, 1.5, 2.5]);
    let cols = Axis::new("unused", vec![0.0, 1.0]);
    let err = run_grid(&rows, &cols, Belief::Committed, Execution::Parallel, |p_cs, _| {
        Scenario::new(ParameterSet::new(p_cs, 0.1, 0.1, 0.1), InitialConditions::new(), 3)
    })
    .unwrap_err();
    assert!(matches!(err, ModelError::InvalidParameter { value, .. } if value == 1.5));
}

#[test]
fn empty_axes_give_empty_grids() {
    let rows = Axis::new("a", vec![0.1, 0.2]);
    let cols = Axis::new("b", Vec::new());
    let grid = run_grid(&rows, &cols, Belief::Denying, Execution::Serial, |_, _| Scenario::default()).unwrap();
    assert_eq!(grid.values, vec![Vec::<f64>::new(), Vec::new()]);
}

#[test]
fn admission_sweep_favours_committed_admissions() {
    let sweep = AdmissionSweep {
        parameters: ParameterSet::new(0.2, 0.4, 0.4, 0.2)
            .with_influence(heterophily())
            .with_policy(TransitionPolicy::WeightedInfluence),
        periods: 10,
        committed_shares: vec![0.1, 0.5],
        denying_shares: vec![0.1, 0.4],
    };
    let grid = sweep.run(Execution::Parallel).unwrap();
    for j in 0..2 {
        assert!(grid.values[1][j] > grid.values[0][j], "{:?}", grid.values);
    }
}

#[test]
fn admission_shares_beyond_one_are_rejected() {
    let sweep = AdmissionSweep {
        parameters: ParameterSet::default(),
        periods: 2,
        committed_shares: vec![0.7],
        denying_shares: vec![0.5],
    };
    assert!(matches!(sweep.run(Execution::Serial), Err(ModelError::InvalidParameter { .. })));
}

#[test]
fn rate_sweep_deserializes_with_defaults() {
    let sweep: RateSweep = serde_json::from_str(r#"{"betas": [0.2, 0.4], "beta_rets": [0.9]}"#).unwrap();
    assert_eq!(sweep.periods, 10);
    assert_eq!(sweep.base.policy, TransitionPolicy::TripleProduct);
    let grid = sweep.run(Execution::Serial).unwrap();
    assert_eq!(grid.values.len(), 2);
    assert_eq!(grid.values[0].len(), 1);
}

#[test]
fn admission_sweep_defaults_to_ten_periods() {
    let sweep: AdmissionSweep =
        serde_json::from_str(r#"{"committed_shares": [0.2], "denying_shares": [0.2]}"#).unwrap();
    assert_eq!(sweep.periods, DEFAULT_SWEEP_PERIODS);
    assert_eq!(sweep.scenario(0.2, 0.2).periods().unwrap(), 10);
}
