use std::io::Write;

use crate::model::engine::Scenario;
use crate::model::state::ResultsTimeSeries;
use crate::model::Belief;

/// Write a plain-text run report: a `key=value` header followed by one CSV
/// line per period and cohort (cohorts numbered from 1).
pub fn write_run_report(
    mut w: impl Write,
    run_id: &str,
    scenario: &Scenario,
    results: &ResultsTimeSeries,
) -> anyhow::Result<()> {
    let p = &scenario.parameters;
    writeln!(w, "run_id={}", run_id)?;
    writeln!(w, "policy={}", p.policy.name())?;
    writeln!(w, "periods={}", results.len().saturating_sub(1))?;
    for (name, value) in p.rates() {
        writeln!(w, "{}={:.6}", name, value)?;
    }
    writeln!(w, "stubbornness={:.6}", p.stubbornness)?;
    writeln!(w)?;
    writeln!(w, "period,cohort,committed,susceptible,denying")?;

    for (period, state) in results.iter().enumerate() {
        for (k, row) in state.rows().iter().enumerate() {
            writeln!(w, "{},{},{:.6},{:.6},{:.6}", period, k + 1, row[0], row[1], row[2])?;
        }
    }
    writeln!(w)?;
    writeln!(w, "period,mean_committed,mean_susceptible,mean_denying")?;
    for (period, state) in results.iter().enumerate() {
        let [c, s, d] = Belief::ALL.map(|b| state.cohort_mean(b));
        writeln!(w, "{},{:.6},{:.6},{:.6}", period, c, s, d)?;
    }
    Ok(())
}
