use std::io::Write;

use beliefsim::io::cohorts::load_conditions_csv;
use beliefsim::io::matrix::load_cohort_matrix_csv;
use beliefsim::io::scenario::{load_scenario_toml, parse_scenario_toml};
use beliefsim::{Belief, TransitionPolicy};

fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).expect("create");
    f.write_all(body.as_bytes()).expect("write");
    path
}

#[test]
fn matrix_csv_skips_labels() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write(
        &tmp,
        "a.csv",
        "cohort,y1,y2,y3,y4\n\
         y1,0.7,0.1,0.1,0.1\n\
         y2,0.1,0.7,0.1,0.1\n\
         y3,0.1,0.1,0.7,0.1\n\
         y4,0.1,0.1,0.1,0.7\n",
    );
    let a = load_cohort_matrix_csv(&path).unwrap();
    assert_eq!(a[2], [0.1, 0.1, 0.7, 0.1]);
}

#[test]
fn matrix_csv_without_header_keeps_every_row() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write(
        &tmp,
        "plain.csv",
        "0.7,0.1,0.1,0.1\n\
         0.1,0.7,0.1,0.1\n\
         0.1,0.1,0.7,0.1\n\
         0.1,0.1,0.1,0.7\n",
    );
    let a = load_cohort_matrix_csv(&path).unwrap();
    assert_eq!(a[0], [0.7, 0.1, 0.1, 0.1]);
    assert_eq!(a[3], [0.1, 0.1, 0.1, 0.7]);

    // a numeric leading row is data, so five rows are rejected
    let extra = write(
        &tmp,
        "extra.csv",
        "9,9,9,9\n0.7,0.1,0.1,0.1\n0.1,0.7,0.1,0.1\n0.1,0.1,0.7,0.1\n0.1,0.1,0.1,0.7\n",
    );
    let err = load_cohort_matrix_csv(&extra).unwrap_err();
    assert!(err.to_string().contains("expected 4 rows"), "{err}");
}

#[test]
fn matrix_csv_must_be_four_by_four() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write(&tmp, "bad.csv", "a,b,c\n1,2,3\n4,5,6\n7,8,9\n");
    let err = load_cohort_matrix_csv(&path).unwrap_err();
    assert!(err.to_string().contains("expected 4 rows"), "{err}");

    assert!(load_cohort_matrix_csv(tmp.path().join("missing.csv")).is_err());
}

#[test]
fn cohort_csv_fills_conditions() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write(
        &tmp,
        "ic.csv",
        "cohort, committed, susceptible, denying\n\
         1, 0.2, 0.6, 0.2\n\
         3, 0.3, 0.4, 0.3\n\
         incoming, 0.5, 0.25, 0.25\n",
    );
    let ic = load_conditions_csv(&path).unwrap();
    assert_eq!(ic.get("S_1"), Some(0.6));
    assert_eq!(ic.get("D_3"), Some(0.3));
    assert_eq!(ic.get("C_incoming"), Some(0.5));
    assert_eq!(ic.get("C_2"), None);

    let bad = write(&tmp, "bad.csv", "cohort,committed,susceptible,denying\n5,0.1,0.1,0.1\n");
    assert!(load_conditions_csv(&bad).is_err());
}

#[test]
fn cohort_csv_rejects_repeated_cohorts() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write(
        &tmp,
        "dup.csv",
        "cohort,committed,susceptible,denying\n2,0.2,0.6,0.2\n2,0.5,0.25,0.25\n",
    );
    let err = load_conditions_csv(&path).unwrap_err();
    assert!(err.to_string().contains("listed twice"), "{err}");
}

#[test]
fn scenario_toml_round_trip_through_a_run() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write(
        &tmp,
        "scenario.toml",
        r#"
periods = 10

[parameters]
p_CS = 0.05
p_SC = 0.20
p_DS = 0.05
p_SD = 0.20
policy = "triple_product"
A = [[0.7, 0.1, 0.1, 0.1], [0.1, 0.7, 0.1, 0.1], [0.1, 0.1, 0.7, 0.1], [0.1, 0.1, 0.1, 0.7]]

[initial_conditions]
C_1 = 0.2
S_1 = 0.6
D_1 = 0.2
C_incoming = 0.3
S_incoming = 0.4
D_incoming = 0.3
"#,
    );
    let scenario = load_scenario_toml(&path).unwrap();
    assert_eq!(scenario.parameters.policy, TransitionPolicy::TripleProduct);
    assert_eq!(scenario.periods, 10);

    let results = scenario.run().unwrap();
    assert_eq!(results.len(), 11);
    assert!(results.final_mean(Belief::Committed).unwrap() > 0.0);
}

#[test]
fn invalid_scenarios_fail_on_load() {
    assert!(parse_scenario_toml("periods = -2").is_err());
    assert!(parse_scenario_toml("[parameters]\np_SD = 1.01").is_err());
    assert!(parse_scenario_toml("[initial_conditions]\nC_9 = 0.5").is_err());
    assert!(parse_scenario_toml("[parameters]\nB = [[0.1, 0.1]]").is_err());
    assert!(parse_scenario_toml("unknown = 1").is_err());
}
