pub mod error;
pub mod io;
pub mod math;
pub mod model;
pub mod sweep;

pub use error::{ModelError, ModelResult};
pub use model::conditions::InitialConditions;
pub use model::engine::{BeliefModel, Scenario};
pub use model::params::{ParameterSet, TransitionPolicy};
pub use model::state::{DistributionMatrix, ResultsTimeSeries};
pub use model::Belief;
