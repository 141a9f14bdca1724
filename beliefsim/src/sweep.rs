use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ModelResult;
use crate::io::presets::elder_efficacy;
use crate::model::conditions::InitialConditions;
use crate::model::engine::Scenario;
use crate::model::params::{ParameterSet, TransitionPolicy};
use crate::model::Belief;

/// `steps` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        n => (0..n).map(|i| start + (end - start) * i as f64 / (n - 1) as f64).collect(),
    }
}

/// One sweep dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub label: String,
    pub values: Vec<f64>,
}

impl Axis {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self { label: label.into(), values }
    }
}

/// Final-period cohort-mean share of one belief for every grid cell.
/// `values[i][j]` belongs to `rows.values[i]` and `cols.values[j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    pub rows: Axis,
    pub cols: Axis,
    pub metric: Belief,
    pub values: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    Parallel,
    Serial,
}

/// Run `build(row, col)` for every cell and record the final mean of `metric`.
/// When any cell fails, the error of the first failing cell in row-major order
/// is returned.
pub fn run_grid<F>(rows: &Axis, cols: &Axis, metric: Belief, exec: Execution, build: F) -> ModelResult<SweepGrid>
where
    F: Fn(f64, f64) -> Scenario + Sync,
{
    let n_cols = cols.values.len();
    let n_cells = rows.values.len() * n_cols;
    info!(rows = %rows.label, cols = %cols.label, cells = n_cells, ?exec, "sweep started");

    let cell = |idx: usize| -> ModelResult<f64> {
        let (i, j) = (idx / n_cols, idx % n_cols);
        let results = build(rows.values[i], cols.values[j]).run()?;
        Ok(results.final_mean(metric).unwrap_or(0.0))
    };

    let outcomes: Vec<ModelResult<f64>> = match exec {
        Execution::Parallel => (0..n_cells).into_par_iter().map(cell).collect(),
        Execution::Serial => (0..n_cells).map(cell).collect(),
    };
    let flat = outcomes.into_iter().collect::<ModelResult<Vec<f64>>>()?;

    let values = if n_cols == 0 {
        vec![Vec::new(); rows.values.len()]
    } else {
        flat.chunks(n_cols).map(|c| c.to_vec()).collect()
    };
    info!(cells = n_cells, "sweep finished");

    Ok(SweepGrid { rows: rows.clone(), cols: cols.clone(), metric, values })
}

/// Periods run per cell when a sweep does not say; sweeps report the
/// ten-year state.
pub const DEFAULT_SWEEP_PERIODS: usize = 10;

fn default_sweep_periods() -> usize {
    DEFAULT_SWEEP_PERIODS
}

fn default_sweep_policy() -> ParameterSet {
    ParameterSet::default().with_policy(TransitionPolicy::TripleProduct)
}

/// Sweep over conversion strength `beta` (`p_SC = p_SD`) against retention
/// loss `beta_ret` (`p_CS = p_DS`), with transmission built by
/// [`elder_efficacy`] from `beta` at every cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSweep {
    /// Contact matrix, policy and stubbornness; the rates and B are overwritten per cell.
    #[serde(default = "default_sweep_policy")]
    pub base: ParameterSet,
    #[serde(default)]
    pub elder_step: f64,
    #[serde(default)]
    pub initial_conditions: InitialConditions,
    #[serde(default = "default_sweep_periods")]
    pub periods: usize,
    pub betas: Vec<f64>,
    pub beta_rets: Vec<f64>,
}

impl RateSweep {
    pub fn scenario(&self, beta: f64, beta_ret: f64) -> Scenario {
        let mut params = self.base.clone().with_transmission(elder_efficacy(beta, self.elder_step));
        params.p_sc = beta;
        params.p_sd = beta;
        params.p_cs = beta_ret;
        params.p_ds = beta_ret;
        Scenario::new(params, self.initial_conditions.clone(), self.periods)
    }

    pub fn run(&self, exec: Execution) -> ModelResult<SweepGrid> {
        run_grid(
            &Axis::new("beta (p_SC, p_SD)", self.betas.clone()),
            &Axis::new("beta_ret (p_CS, p_DS)", self.beta_rets.clone()),
            Belief::Committed,
            exec,
            |beta, beta_ret| self.scenario(beta, beta_ret),
        )
    }
}

/// Sweep over admission shares: every cohort and the incoming class start at
/// `(c, 1 - c - d, d)`. Cells with `c + d > 1` fail as invalid input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionSweep {
    #[serde(default = "default_sweep_policy")]
    pub parameters: ParameterSet,
    #[serde(default = "default_sweep_periods")]
    pub periods: usize,
    pub committed_shares: Vec<f64>,
    pub denying_shares: Vec<f64>,
}

impl AdmissionSweep {
    pub fn scenario(&self, c: f64, d: f64) -> Scenario {
        Scenario::new(
            self.parameters.clone(),
            InitialConditions::uniform([c, 1.0 - c - d, d]),
            self.periods,
        )
    }

    pub fn run(&self, exec: Execution) -> ModelResult<SweepGrid> {
        run_grid(
            &Axis::new("C admission share", self.committed_shares.clone()),
            &Axis::new("D admission share", self.denying_shares.clone()),
            Belief::Committed,
            exec,
            |c, d| self.scenario(c, d),
        )
    }
}
