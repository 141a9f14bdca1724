use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::conditions::InitialConditions;
use crate::model::{Belief, BELIEFS, COHORTS};

/// One cohort's proportions, indexed by [`Belief::index`].
pub type BeliefRow = [f64; BELIEFS];

/// Tolerance used when checking that a row sums to one.
pub const SIMPLEX_TOL: f64 = 1e-9;

/// Cohort x belief proportions. Every row is a point on the simplex once a
/// step has completed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistributionMatrix {
    rows: [BeliefRow; COHORTS],
}

/// Divide a row of non-negative weights by its sum.
///
/// Returns `None` when the sum is zero (or not finite), leaving the caller to
/// decide which error that is.
pub fn normalize_row(row: BeliefRow) -> Option<BeliefRow> {
    let total: f64 = row.iter().sum();
    if total > 0.0 && total.is_finite() {
        Some(row.map(|v| v / total))
    } else {
        None
    }
}

/// Normalize a row that came straight from caller input.
pub(crate) fn normalize_input(name: &str, row: BeliefRow) -> ModelResult<BeliefRow> {
    let total: f64 = row.iter().sum();
    normalize_row(row).ok_or_else(|| ModelError::invalid(name, total, "weights must have a positive sum"))
}

impl DistributionMatrix {
    /// Wrap rows without checking them.
    pub fn from_rows(rows: [BeliefRow; COHORTS]) -> Self {
        Self { rows }
    }

    /// Build the period-0 matrix: resolve each cohort's weights and normalize.
    pub fn initialize(conditions: &InitialConditions) -> ModelResult<Self> {
        conditions.check()?;
        let mut rows = [[0.0; BELIEFS]; COHORTS];
        for (i, row) in rows.iter_mut().enumerate() {
            let k = i + 1;
            *row = normalize_input(&format!("cohort {k} initial weights"), conditions.cohort_weights(k))?;
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[BeliefRow; COHORTS] {
        &self.rows
    }

    pub fn get(&self, cohort: usize, belief: Belief) -> f64 {
        self.rows[cohort][belief.index()]
    }

    /// One belief's share in every cohort.
    pub fn column(&self, belief: Belief) -> [f64; COHORTS] {
        self.rows.map(|r| r[belief.index()])
    }

    /// Population-wide share of `belief`, weighting cohorts equally.
    pub fn cohort_mean(&self, belief: Belief) -> f64 {
        self.column(belief).iter().sum::<f64>() / COHORTS as f64
    }

    pub fn is_simplex(&self, tol: f64) -> bool {
        self.rows
            .iter()
            .all(|r| r.iter().all(|v| *v >= 0.0) && (r.iter().sum::<f64>() - 1.0).abs() <= tol)
    }
}

impl Index<usize> for DistributionMatrix {
    type Output = BeliefRow;

    fn index(&self, cohort: usize) -> &BeliefRow {
        &self.rows[cohort]
    }
}

/// Matrices for periods `0..=periods`, each recorded once and never touched again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultsTimeSeries {
    states: Vec<DistributionMatrix>,
}

impl ResultsTimeSeries {
    pub(crate) fn with_initial(initial: DistributionMatrix, periods: usize) -> Self {
        let mut states = Vec::with_capacity(periods + 1);
        states.push(initial);
        Self { states }
    }

    pub(crate) fn record(&mut self, state: DistributionMatrix) {
        self.states.push(state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, period: usize) -> Option<&DistributionMatrix> {
        self.states.get(period)
    }

    pub fn last(&self) -> Option<&DistributionMatrix> {
        self.states.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DistributionMatrix> {
        self.states.iter()
    }

    /// Cohort-mean share of `belief` for every recorded period.
    pub fn mean_series(&self, belief: Belief) -> Vec<f64> {
        self.states.iter().map(|s| s.cohort_mean(belief)).collect()
    }

    /// Cohort-mean share of `belief` in the last recorded period.
    pub fn final_mean(&self, belief: Belief) -> Option<f64> {
        self.last().map(|s| s.cohort_mean(belief))
    }
}

impl Index<usize> for ResultsTimeSeries {
    type Output = DistributionMatrix;

    fn index(&self, period: usize) -> &DistributionMatrix {
        &self.states[period]
    }
}

impl<'a> IntoIterator for &'a ResultsTimeSeries {
    type Item = &'a DistributionMatrix;
    type IntoIter = std::slice::Iter<'a, DistributionMatrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}
