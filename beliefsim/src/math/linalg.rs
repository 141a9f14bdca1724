use crate::model::COHORTS;

/// Square matrix indexed by cohort pair.
pub type CohortMatrix = [[f64; COHORTS]; COHORTS];

/// y = A x over cohorts.
pub fn mat_vec(a: &CohortMatrix, x: &[f64; COHORTS]) -> [f64; COHORTS] {
    let mut y = [0.0; COHORTS];
    for i in 0..COHORTS {
        let mut sum = 0.0;
        for j in 0..COHORTS {
            sum += a[i][j] * x[j];
        }
        y[i] = sum;
    }
    y
}

/// Elementwise (Hadamard) product A ⊙ B.
pub fn hadamard(a: &CohortMatrix, b: &CohortMatrix) -> CohortMatrix {
    let mut m = [[0.0; COHORTS]; COHORTS];
    for i in 0..COHORTS {
        for j in 0..COHORTS {
            m[i][j] = a[i][j] * b[i][j];
        }
    }
    m
}

/// Constant matrix, every entry equal to `v`.
pub fn uniform(v: f64) -> CohortMatrix {
    [[v; COHORTS]; COHORTS]
}

/// Convert a ragged `Vec<Vec<f64>>` into a fixed cohort matrix, or report the
/// first structural mismatch as `(expected, found)`.
pub fn to_cohort_matrix(rows: &[Vec<f64>]) -> Result<CohortMatrix, (String, String)> {
    if rows.len() != COHORTS {
        return Err((format!("{COHORTS} rows"), format!("{} rows", rows.len())));
    }
    let mut m = [[0.0; COHORTS]; COHORTS];
    for (i, row) in rows.iter().enumerate() {
        if row.len() != COHORTS {
            return Err((format!("{COHORTS} columns in row {i}"), format!("{} columns", row.len())));
        }
        m[i].copy_from_slice(row);
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mat_vec_row_sums_for_ones() {
        let a = [
            [1.0, 2.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.5, 0.5, 0.5, 0.5],
            [0.0, 0.0, 0.0, 3.0],
        ];
        assert_eq!(mat_vec(&a, &[1.0; 4]), [3.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![0.25; 4], vec![0.25; 4], vec![0.25; 3], vec![0.25; 4]];
        let (expected, found) = to_cohort_matrix(&rows).unwrap_err();
        assert_eq!(expected, "4 columns in row 2");
        assert_eq!(found, "3 columns");
        assert!(to_cohort_matrix(&rows[..3]).is_err());
    }
}
