use anyhow::Context;

use crate::math::linalg::{to_cohort_matrix, CohortMatrix};

/// Load a cohort x cohort matrix (influence A or transmission B) from CSV.
/// Non-numeric cells such as row labels are skipped, as is any row with no
/// number in it (a header). Every remaining row must hold one number per cohort.
pub fn load_cohort_matrix_csv(path: impl AsRef<std::path::Path>) -> anyhow::Result<CohortMatrix> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open matrix CSV: {}", path.display()))?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for result in rdr.records() {
        let record = result.with_context(|| format!("Bad record in {}", path.display()))?;
        let vals: Vec<f64> = record.iter().filter_map(|f| f.trim().parse::<f64>().ok()).collect();
        if !vals.is_empty() {
            rows.push(vals);
        }
    }
    anyhow::ensure!(!rows.is_empty(), "matrix CSV {} empty or unparsable", path.display());
    anyhow::ensure!(rows.iter().flatten().all(|v| v.is_finite()), "matrix CSV {} holds non-finite values", path.display());

    to_cohort_matrix(&rows).map_err(|(expected, found)| {
        anyhow::anyhow!("matrix CSV {}: expected {}, found {}", path.display(), expected, found)
    })
}
