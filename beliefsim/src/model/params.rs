use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::math::linalg::{self, CohortMatrix};

/// Rate used for any `p_*` left out of a parameter file.
pub const DEFAULT_RATE: f64 = 0.05;
/// Entry of the default (uniform) influence matrix.
pub const DEFAULT_INFLUENCE: f64 = 0.25;

/// How flows between belief states are computed. The two formulas give
/// qualitatively different long-run behaviour and are never mixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Linear outflows; S->C driven by contact-weighted exposure to every
    /// cohort's Committed share. Ignores the transmission matrix.
    #[default]
    WeightedInfluence,
    /// S->C driven by `(A ⊙ B) · C`; the C, D outflows and S->D scale with
    /// `C*S*D` (or `S*D`) and vanish in unmixed cohorts.
    TripleProduct,
}

impl TransitionPolicy {
    pub fn name(self) -> &'static str {
        match self {
            TransitionPolicy::WeightedInfluence => "weighted_influence",
            TransitionPolicy::TripleProduct => "triple_product",
        }
    }
}

/// Parameter set as supplied by a caller or a scenario file.
///
/// Matrices stay as nested vectors here so that malformed input can be
/// reported with its actual shape; [`ParameterSet::resolve`] produces the
/// checked, fixed-size form the engine runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSet {
    #[serde(alias = "p_CS", default = "default_rate")]
    pub p_cs: f64,
    #[serde(alias = "p_SC", default = "default_rate")]
    pub p_sc: f64,
    #[serde(alias = "p_SD", default = "default_rate")]
    pub p_sd: f64,
    #[serde(alias = "p_DS", default = "default_rate")]
    pub p_ds: f64,

    /// Contact weights A[i][j]: exposure of cohort i's Susceptible to cohort j's Committed.
    #[serde(alias = "A", alias = "alpha", default, skip_serializing_if = "Option::is_none")]
    pub influence: Option<Vec<Vec<f64>>>,
    /// Transmission modifiers B[i][j], multiplied into A under the triple-product policy.
    /// Defaults to a matrix filled with `p_sc`.
    #[serde(alias = "B", default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<Vec<Vec<f64>>>,

    /// Per-cohort damping of C->S and D->S (cohort i scales by `stubbornness^i`).
    #[serde(default = "default_stubbornness")]
    pub stubbornness: f64,

    #[serde(default)]
    pub policy: TransitionPolicy,
}

fn default_rate() -> f64 {
    DEFAULT_RATE
}

fn default_stubbornness() -> f64 {
    1.0
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new(DEFAULT_RATE, DEFAULT_RATE, DEFAULT_RATE, DEFAULT_RATE)
    }
}

impl ParameterSet {
    pub fn new(p_cs: f64, p_sc: f64, p_sd: f64, p_ds: f64) -> Self {
        Self {
            p_cs,
            p_sc,
            p_sd,
            p_ds,
            influence: None,
            transmission: None,
            stubbornness: 1.0,
            policy: TransitionPolicy::default(),
        }
    }

    pub fn with_influence(mut self, a: CohortMatrix) -> Self {
        self.influence = Some(a.iter().map(|r| r.to_vec()).collect());
        self
    }

    pub fn with_transmission(mut self, b: CohortMatrix) -> Self {
        self.transmission = Some(b.iter().map(|r| r.to_vec()).collect());
        self
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_stubbornness(mut self, stubbornness: f64) -> Self {
        self.stubbornness = stubbornness;
        self
    }

    /// The four base rates with their names, in a fixed order.
    pub fn rates(&self) -> [(&'static str, f64); 4] {
        [("p_CS", self.p_cs), ("p_SC", self.p_sc), ("p_SD", self.p_sd), ("p_DS", self.p_ds)]
    }

    /// Validate every field and materialise the default matrices.
    pub fn resolve(&self) -> ModelResult<TransitionParams> {
        for (name, value) in self.rates() {
            check_probability(name, value)?;
        }
        check_probability("stubbornness", self.stubbornness)?;

        let influence = match &self.influence {
            Some(rows) => matrix_field("influence matrix A", rows)?,
            None => linalg::uniform(DEFAULT_INFLUENCE),
        };
        let transmission = match &self.transmission {
            Some(rows) => matrix_field("transmission matrix B", rows)?,
            None => linalg::uniform(self.p_sc),
        };

        Ok(TransitionParams {
            p_cs: self.p_cs,
            p_sc: self.p_sc,
            p_sd: self.p_sd,
            p_ds: self.p_ds,
            stubbornness: self.stubbornness,
            influence,
            transmission,
            policy: self.policy,
        })
    }
}

/// Checked parameters in the form the transition step consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionParams {
    pub p_cs: f64,
    pub p_sc: f64,
    pub p_sd: f64,
    pub p_ds: f64,
    pub stubbornness: f64,
    pub influence: CohortMatrix,
    pub transmission: CohortMatrix,
    pub policy: TransitionPolicy,
}

pub(crate) fn check_probability(name: &str, value: f64) -> ModelResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ModelError::invalid(name, value, "must lie in [0, 1]"));
    }
    Ok(())
}

fn matrix_field(what: &str, rows: &[Vec<f64>]) -> ModelResult<CohortMatrix> {
    let m = linalg::to_cohort_matrix(rows).map_err(|(expected, found)| ModelError::shape(what, expected, found))?;
    for (i, row) in m.iter().enumerate() {
        for (j, v) in row.iter().enumerate() {
            if !v.is_finite() {
                return Err(ModelError::invalid(format!("{what}[{i}][{j}]"), *v, "must be finite"));
            }
        }
    }
    Ok(m)
}
