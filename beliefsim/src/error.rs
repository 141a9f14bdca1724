/// Errors raised while building or stepping a belief model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// A scalar input lies outside its admissible range.
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        /// Parameter or mapping key.
        name: String,
        /// Offending value.
        value: f64,
        /// What the value must satisfy.
        reason: &'static str,
    },

    /// A cohort row carries no mass after the transition step.
    #[error("cohort {cohort} has zero mass after period {period}")]
    InvalidState {
        /// Period whose transition emptied the row.
        period: usize,
        /// Zero-based cohort index.
        cohort: usize,
    },

    /// A matrix or mapping does not have the expected structure.
    #[error("malformed {what}: expected {expected}, found {found}")]
    Shape {
        /// Which input was malformed.
        what: String,
        /// Expected structure.
        expected: String,
        /// Observed structure.
        found: String,
    },
}

impl ModelError {
    pub(crate) fn invalid(name: impl Into<String>, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter { name: name.into(), value, reason }
    }

    pub(crate) fn shape(what: impl Into<String>, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Shape { what: what.into(), expected: expected.into(), found: found.into() }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
