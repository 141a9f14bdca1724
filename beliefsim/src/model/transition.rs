use tracing::trace;

use crate::error::{ModelError, ModelResult};
use crate::math::linalg::{hadamard, mat_vec};
use crate::model::params::{TransitionParams, TransitionPolicy};
use crate::model::state::{normalize_row, BeliefRow, DistributionMatrix};
use crate::model::{Belief, BELIEFS, COHORTS};

/// Mass moved between adjacent belief states in one cohort over one period.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CohortFlows {
    pub c_to_s: f64,
    pub s_to_c: f64,
    pub s_to_d: f64,
    pub d_to_s: f64,
}

impl CohortFlows {
    /// Apply the flows to `row`. Flows cancel pairwise, so the row sum is
    /// preserved up to round-off; components may dip below zero.
    pub fn apply(&self, row: &BeliefRow) -> BeliefRow {
        let [c, s, d] = *row;
        [
            c - self.c_to_s + self.s_to_c,
            s - self.s_to_c - self.s_to_d + self.c_to_s + self.d_to_s,
            d - self.d_to_s + self.s_to_d,
        ]
    }
}

/// Flows for every cohort of the aged matrix under `params.policy`. Every
/// flow reads the same snapshot; no row is updated here.
pub fn flows(aged: &DistributionMatrix, params: &TransitionParams) -> [CohortFlows; COHORTS] {
    let committed = aged.column(Belief::Committed);
    let mut out = [CohortFlows::default(); COHORTS];

    match params.policy {
        TransitionPolicy::WeightedInfluence => {
            let exposure = mat_vec(&params.influence, &committed);
            let mut stub = 1.0;
            for (i, f) in out.iter_mut().enumerate() {
                let [c, s, d] = aged[i];
                *f = CohortFlows {
                    c_to_s: c * params.p_cs * stub,
                    s_to_c: params.p_sc * s * exposure[i],
                    s_to_d: s * params.p_sd,
                    d_to_s: d * params.p_ds * stub,
                };
                stub *= params.stubbornness;
            }
        }
        TransitionPolicy::TripleProduct => {
            let exposure = mat_vec(&hadamard(&params.influence, &params.transmission), &committed);
            for (i, f) in out.iter_mut().enumerate() {
                let [c, s, d] = aged[i];
                let mixed = c * s * d;
                *f = CohortFlows {
                    c_to_s: mixed * params.p_cs,
                    s_to_c: s * exposure[i],
                    s_to_d: d * s * params.p_sd,
                    d_to_s: mixed * params.p_ds,
                };
            }
        }
    }
    out
}

/// Rows after applying `flows`, before clamping or renormalization.
pub fn apply_flows(aged: &DistributionMatrix, flows: &[CohortFlows; COHORTS]) -> [BeliefRow; COHORTS] {
    let mut rows = [[0.0; BELIEFS]; COHORTS];
    for (i, row) in rows.iter_mut().enumerate() {
        *row = flows[i].apply(&aged[i]);
    }
    rows
}

/// Full transition step for `period`: flows, clamp, renormalize.
///
/// A row with no mass left after clamping is an [`ModelError::InvalidState`].
pub fn transition(aged: &DistributionMatrix, params: &TransitionParams, period: usize) -> ModelResult<DistributionMatrix> {
    let raw = apply_flows(aged, &flows(aged, params));
    let mut rows = [[0.0; BELIEFS]; COHORTS];

    for (cohort, (out, row)) in rows.iter_mut().zip(raw).enumerate() {
        let clamped = row.map(|v| {
            if v < 0.0 {
                trace!(period, cohort, value = v, "clamping negative share");
                0.0
            } else {
                v
            }
        });
        *out = normalize_row(clamped).ok_or(ModelError::InvalidState { period, cohort })?;
    }

    Ok(DistributionMatrix::from_rows(rows))
}
