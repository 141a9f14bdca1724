use anyhow::Context;
use serde::Deserialize;

use crate::model::conditions::{key, InitialConditions, Slot};
use crate::model::{Belief, COHORTS};

#[derive(Debug, Deserialize)]
struct CohortRow {
    cohort: String,
    committed: f64,
    susceptible: f64,
    denying: f64,
}

/// Load initial conditions from a CSV with columns
/// `cohort,committed,susceptible,denying`, where `cohort` is `1`..`4` or
/// `incoming`. Cohorts absent from the file fall back to their defaults; a
/// cohort listed twice is an error.
pub fn load_conditions_csv(path: impl AsRef<std::path::Path>) -> anyhow::Result<InitialConditions> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open cohort CSV: {}", path.display()))?;

    let mut ic = InitialConditions::new();
    let mut seen = Vec::new();
    for result in rdr.deserialize::<CohortRow>() {
        let row = result.with_context(|| format!("Bad row in {}", path.display()))?;
        let slot = match row.cohort.as_str() {
            "incoming" => Slot::Incoming,
            n => {
                let k: usize = n.parse().with_context(|| format!("cohort label {n:?} in {}", path.display()))?;
                anyhow::ensure!((1..=COHORTS).contains(&k), "cohort {} out of range 1..={}", k, COHORTS);
                Slot::Cohort(k)
            }
        };
        anyhow::ensure!(!seen.contains(&slot), "cohort {} listed twice in {}", row.cohort, path.display());
        seen.push(slot);
        for (b, v) in Belief::ALL.into_iter().zip([row.committed, row.susceptible, row.denying]) {
            ic.set(key(b, slot), v);
        }
    }
    ic.check()?;
    Ok(ic)
}
