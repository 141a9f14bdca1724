use beliefsim::io::presets::mild_homophily;
use beliefsim::{Belief, InitialConditions, ParameterSet, Scenario};

fn main() -> anyhow::Result<()> {
    // Strong conversion, weak retention loss; each cohort starts a little more polarized.
    let parameters = ParameterSet::new(0.05, 0.20, 0.20, 0.05).with_influence(mild_homophily());

    let initial_conditions = InitialConditions::new()
        .with_cohort(1, [0.2, 0.6, 0.2])
        .with_cohort(2, [0.25, 0.5, 0.25])
        .with_cohort(3, [0.3, 0.4, 0.3])
        .with_cohort(4, [0.35, 0.3, 0.35])
        .with_incoming([0.3, 0.4, 0.3]);

    let scenario = Scenario::new(parameters, initial_conditions, 10);
    let results = scenario.run()?;

    println!("year,total_C,total_S,total_D,C_1,C_2,C_3,C_4");
    for (year, state) in results.iter().enumerate() {
        let c = state.column(Belief::Committed);
        println!(
            "{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            year,
            state.cohort_mean(Belief::Committed),
            state.cohort_mean(Belief::Susceptible),
            state.cohort_mean(Belief::Denying),
            c[0],
            c[1],
            c[2],
            c[3]
        );
    }

    Ok(())
}
