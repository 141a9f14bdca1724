use crate::math::linalg::{uniform, CohortMatrix};
use crate::model::COHORTS;

fn diagonal(on: f64, off: f64) -> CohortMatrix {
    let mut m = uniform(off);
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = on;
    }
    m
}

/// Strong same-cohort contact: 0.7 on the diagonal, 0.1 elsewhere.
pub fn homophily() -> CohortMatrix {
    diagonal(0.7, 0.1)
}

/// Weak same-cohort contact: 0.1 on the diagonal, 0.3 elsewhere.
pub fn heterophily() -> CohortMatrix {
    diagonal(0.1, 0.3)
}

/// Survey-derived contact profile, identical for every receiving cohort.
pub fn sta_data() -> CohortMatrix {
    [[0.3, 0.3, 0.25, 0.15]; COHORTS]
}

/// Half of all contact within the cohort, the rest spread evenly.
pub fn mild_homophily() -> CohortMatrix {
    diagonal(0.5, 0.5 / 3.0)
}

/// Transmission where older cohorts are more persuasive:
/// `B[i][j] = beta + step * (j - i)`, rounded to three decimals.
pub fn elder_efficacy(beta: f64, step: f64) -> CohortMatrix {
    let mut b = uniform(0.0);
    for (i, row) in b.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            let raw = beta + step * (j as f64 - i as f64);
            *v = (raw * 1000.0).round() / 1000.0;
        }
    }
    b
}

/// Look a contact preset up by name.
pub fn contact_by_name(name: &str) -> Option<CohortMatrix> {
    match name {
        "homophily" => Some(homophily()),
        "heterophily" => Some(heterophily()),
        "sta_data" | "sta" => Some(sta_data()),
        "mild_homophily" => Some(mild_homophily()),
        "uniform" => Some(uniform(0.25)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elder_efficacy_grows_toward_older_sources() {
        let b = elder_efficacy(0.4, 0.1);
        assert_eq!(b[0], [0.4, 0.5, 0.6, 0.7]);
        assert_eq!(b[3], [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(elder_efficacy(0.4, 0.0), uniform(0.4));
    }

    #[test]
    fn presets_by_name() {
        assert_eq!(contact_by_name("homophily").unwrap()[2], [0.1, 0.1, 0.7, 0.1]);
        assert_eq!(contact_by_name("heterophily").unwrap()[0][0], 0.1);
        assert!(contact_by_name("nope").is_none());
    }
}
