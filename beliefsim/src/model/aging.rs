use crate::error::ModelResult;
use crate::model::conditions::InitialConditions;
use crate::model::state::{normalize_input, BeliefRow, DistributionMatrix};
use crate::model::COHORTS;

/// Normalized incoming distribution, resolved through the incoming fallback chain.
pub fn incoming_distribution(conditions: &InitialConditions) -> ModelResult<BeliefRow> {
    normalize_input("incoming weights", conditions.incoming_weights())
}

/// Shift `prev` one cohort older and inject `incoming` at the youngest slot.
///
/// The previous oldest cohort is discarded.
pub fn age(prev: &DistributionMatrix, incoming: &BeliefRow) -> DistributionMatrix {
    let mut rows = *prev.rows();
    rows.copy_within(0..COHORTS - 1, 1);
    rows[0] = *incoming;
    DistributionMatrix::from_rows(rows)
}
