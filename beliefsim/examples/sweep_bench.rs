use std::time::Instant;

use beliefsim::io::presets::homophily;
use beliefsim::sweep::{linspace, Execution, RateSweep};
use beliefsim::{InitialConditions, ParameterSet, TransitionPolicy};

fn main() -> anyhow::Result<()> {
    // Large grid to amplify the difference between serial and parallel sweeps
    let sweep = RateSweep {
        base: ParameterSet::default()
            .with_influence(homophily())
            .with_policy(TransitionPolicy::TripleProduct),
        elder_step: 0.1,
        initial_conditions: InitialConditions::uniform([1.0 / 3.0; 3]),
        periods: 10,
        betas: linspace(0.0, 1.0, 200),
        beta_rets: linspace(0.0, 1.0, 200),
    };

    let t_start = Instant::now();
    let serial = sweep.run(Execution::Serial)?;
    let dur1 = t_start.elapsed();

    let t_start2 = Instant::now();
    let parallel = sweep.run(Execution::Parallel)?;
    let dur2 = t_start2.elapsed();

    anyhow::ensure!(serial == parallel, "serial and parallel sweeps disagree");

    println!("serial_ms,parallel_ms,speedup_x");
    let s_ms = dur1.as_secs_f64() * 1000.0;
    let p_ms = dur2.as_secs_f64() * 1000.0;
    println!("{:.3},{:.3},{:.2}", s_ms, p_ms, s_ms.max(1e-9) / p_ms.max(1e-9));

    Ok(())
}
