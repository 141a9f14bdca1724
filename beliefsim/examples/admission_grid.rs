use beliefsim::io::presets::{elder_efficacy, sta_data};
use beliefsim::sweep::{linspace, AdmissionSweep, Execution};
use beliefsim::{ParameterSet, TransitionPolicy};

fn main() -> anyhow::Result<()> {
    // Final C share by admission mix, STA contact data with elder efficacy 0.1.
    for (beta, beta_ret) in [(0.40, 0.20), (0.2, 0.9)] {
        let parameters = ParameterSet::new(beta_ret, beta, beta, beta_ret)
            .with_influence(sta_data())
            .with_transmission(elder_efficacy(beta, 0.1))
            .with_policy(TransitionPolicy::TripleProduct);

        let sweep = AdmissionSweep {
            parameters,
            periods: 10,
            committed_shares: linspace(0.0, 0.5, 21),
            denying_shares: linspace(0.0, 0.5, 21),
        };
        let grid = sweep.run(Execution::Parallel)?;

        println!("# beta={beta} beta_ret={beta_ret}");
        println!("c_share,d_share,final_C");
        for (i, row) in grid.values.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                println!("{:.3},{:.3},{:.6}", grid.rows.values[i], grid.cols.values[j], v);
            }
        }
    }
    Ok(())
}
