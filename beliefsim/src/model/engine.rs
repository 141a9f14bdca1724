use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::model::aging::{age, incoming_distribution};
use crate::model::conditions::InitialConditions;
use crate::model::params::{ParameterSet, TransitionParams};
use crate::model::state::{BeliefRow, DistributionMatrix, ResultsTimeSeries};
use crate::model::transition::transition;
use crate::model::Belief;

/// Periods simulated when a scenario does not say.
pub const DEFAULT_PERIODS: i64 = 4;

/// Everything needed to start one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub parameters: ParameterSet,
    #[serde(default)]
    pub initial_conditions: InitialConditions,
    /// Signed so that a negative request can be reported rather than failing to parse.
    #[serde(default = "default_periods", alias = "simulation_years")]
    pub periods: i64,
}

fn default_periods() -> i64 {
    DEFAULT_PERIODS
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            parameters: ParameterSet::default(),
            initial_conditions: InitialConditions::default(),
            periods: DEFAULT_PERIODS,
        }
    }
}

impl Scenario {
    /// Counts beyond `i64::MAX` saturate.
    pub fn new(parameters: ParameterSet, initial_conditions: InitialConditions, periods: usize) -> Self {
        Self { parameters, initial_conditions, periods: i64::try_from(periods).unwrap_or(i64::MAX) }
    }

    pub fn periods(&self) -> ModelResult<usize> {
        usize::try_from(self.periods)
            .map_err(|_| ModelError::invalid("periods", self.periods as f64, "must be >= 0"))
    }

    pub fn build(&self) -> ModelResult<BeliefModel> {
        BeliefModel::new(&self.parameters, &self.initial_conditions, self.periods()?)
    }

    /// Build and run to completion, keeping only the time series.
    pub fn run(&self) -> ModelResult<ResultsTimeSeries> {
        let mut model = self.build()?;
        model.run()?;
        Ok(model.into_results())
    }
}

/// One simulation run: fixed parameters, a current matrix, and the series
/// recorded so far.
#[derive(Debug, Clone)]
pub struct BeliefModel {
    params: TransitionParams,
    incoming: BeliefRow,
    periods: usize,
    state: DistributionMatrix,
    results: ResultsTimeSeries,
}

impl BeliefModel {
    /// Validate inputs and record the normalized initial matrix as period 0.
    pub fn new(parameters: &ParameterSet, conditions: &InitialConditions, periods: usize) -> ModelResult<Self> {
        let params = parameters.resolve()?;
        let state = DistributionMatrix::initialize(conditions)?;
        let incoming = incoming_distribution(conditions)?;

        Ok(Self {
            params,
            incoming,
            periods,
            state,
            results: ResultsTimeSeries::with_initial(state, periods),
        })
    }

    pub fn params(&self) -> &TransitionParams {
        &self.params
    }

    pub fn incoming(&self) -> &BeliefRow {
        &self.incoming
    }

    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Matrix of the last completed period.
    pub fn state(&self) -> &DistributionMatrix {
        &self.state
    }

    pub fn results(&self) -> &ResultsTimeSeries {
        &self.results
    }

    pub fn into_results(self) -> ResultsTimeSeries {
        self.results
    }

    pub fn is_complete(&self) -> bool {
        self.results.len() > self.periods
    }

    /// Advance one period: age, then transition, then record.
    fn step(&mut self) -> ModelResult<()> {
        let period = self.results.len();
        let aged = age(&self.state, &self.incoming);
        self.state = transition(&aged, &self.params, period)?;
        self.results.record(self.state);
        debug!(
            period,
            committed = self.state.cohort_mean(Belief::Committed),
            denying = self.state.cohort_mean(Belief::Denying),
            "period complete"
        );
        Ok(())
    }

    /// Run every remaining period. Calling again after completion returns the
    /// recorded series without stepping.
    pub fn run(&mut self) -> ModelResult<&ResultsTimeSeries> {
        if !self.is_complete() {
            debug!(periods = self.periods, policy = ?self.params.policy, "running belief model");
        }
        while !self.is_complete() {
            self.step()?;
        }
        Ok(&self.results)
    }
}
