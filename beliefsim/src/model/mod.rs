//! Discrete-time belief diffusion across a fixed pipeline of age cohorts.

use serde::{Deserialize, Serialize};

pub mod aging;
pub mod conditions;
pub mod engine;
pub mod params;
pub mod state;
pub mod transition;

/// Number of age cohorts in the pipeline.
pub const COHORTS: usize = 4;
/// Number of belief states per cohort.
pub const BELIEFS: usize = 3;

/// Belief category. The discriminant is the column index in every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Belief {
    Committed = 0,
    Susceptible = 1,
    Denying = 2,
}

impl Belief {
    pub const ALL: [Belief; BELIEFS] = [Belief::Committed, Belief::Susceptible, Belief::Denying];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-letter prefix used in initial-condition keys (`C_1`, `S_incoming`, ...).
    pub fn letter(self) -> char {
        match self {
            Belief::Committed => 'C',
            Belief::Susceptible => 'S',
            Belief::Denying => 'D',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        Belief::ALL.into_iter().find(|b| b.letter() == c)
    }
}
