//! Initial and incoming cohort distributions.
//!
//! Inputs arrive as a flat mapping keyed `{C,S,D}_{1..4}` and
//! `{C,S,D}_incoming`, every key optional. Missing values are filled by an
//! explicit, ordered fallback per field:
//!
//! * cohort `k`: `X_k`, then 1/3;
//! * incoming: `X_incoming`, then `X_1`, then 1/3.
//!
//! Values are raw weights; rows are normalized by the state model, not here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::{Belief, BELIEFS, COHORTS};

/// Weight assumed for any belief left unspecified.
pub const DEFAULT_SHARE: f64 = 1.0 / 3.0;

/// Slot addressed by an initial-condition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// One-based cohort number, as written in the keys.
    Cohort(usize),
    Incoming,
}

/// Which tier of the fallback chain produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Explicit,
    FirstCohort,
    Default,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitialConditions {
    values: BTreeMap<String, f64>,
}

pub fn key(belief: Belief, slot: Slot) -> String {
    match slot {
        Slot::Cohort(k) => format!("{}_{}", belief.letter(), k),
        Slot::Incoming => format!("{}_incoming", belief.letter()),
    }
}

pub fn parse_key(key: &str) -> Option<(Belief, Slot)> {
    let (prefix, suffix) = key.split_once('_')?;
    let mut chars = prefix.chars();
    let belief = Belief::from_letter(chars.next()?)?;
    if chars.next().is_some() {
        return None;
    }
    let slot = match suffix {
        "incoming" => Slot::Incoming,
        n => match n.parse::<usize>() {
            Ok(k) if (1..=COHORTS).contains(&k) => Slot::Cohort(k),
            _ => return None,
        },
    };
    Some((belief, slot))
}

impl InitialConditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same proportions for every cohort and for the incoming class.
    pub fn uniform(row: [f64; BELIEFS]) -> Self {
        let mut ic = Self::new();
        for k in 1..=COHORTS {
            ic = ic.with_cohort(k, row);
        }
        ic.with_incoming(row)
    }

    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Set all three weights of one-based cohort `k`.
    pub fn with_cohort(mut self, k: usize, row: [f64; BELIEFS]) -> Self {
        for b in Belief::ALL {
            self.set(key(b, Slot::Cohort(k)), row[b.index()]);
        }
        self
    }

    pub fn with_incoming(mut self, row: [f64; BELIEFS]) -> Self {
        for b in Belief::ALL {
            self.set(key(b, Slot::Incoming), row[b.index()]);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Reject unknown keys and weights that are negative or not finite.
    pub fn check(&self) -> ModelResult<()> {
        for (k, v) in self.iter() {
            if parse_key(k).is_none() {
                return Err(ModelError::shape(
                    "initial conditions",
                    "keys {C,S,D}_{1..4} or {C,S,D}_incoming",
                    format!("key {k:?}"),
                ));
            }
            if !v.is_finite() || v < 0.0 {
                return Err(ModelError::invalid(k, v, "must be a finite, non-negative weight"));
            }
        }
        Ok(())
    }

    /// Resolve one cohort weight: `X_k`, then the default share.
    pub fn resolve_cohort(&self, belief: Belief, k: usize) -> (f64, Source) {
        match self.get(&key(belief, Slot::Cohort(k))) {
            Some(v) => (v, Source::Explicit),
            None => (DEFAULT_SHARE, Source::Default),
        }
    }

    /// Resolve one incoming weight: `X_incoming`, then `X_1`, then the default share.
    pub fn resolve_incoming(&self, belief: Belief) -> (f64, Source) {
        if let Some(v) = self.get(&key(belief, Slot::Incoming)) {
            return (v, Source::Explicit);
        }
        match self.get(&key(belief, Slot::Cohort(1))) {
            Some(v) => (v, Source::FirstCohort),
            None => (DEFAULT_SHARE, Source::Default),
        }
    }

    /// Unnormalized weights of one-based cohort `k`.
    pub fn cohort_weights(&self, k: usize) -> [f64; BELIEFS] {
        Belief::ALL.map(|b| self.resolve_cohort(b, k).0)
    }

    /// Unnormalized weights of the incoming class.
    pub fn incoming_weights(&self) -> [f64; BELIEFS] {
        Belief::ALL.map(|b| self.resolve_incoming(b).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_both_ways() {
        assert_eq!(parse_key("C_1"), Some((Belief::Committed, Slot::Cohort(1))));
        assert_eq!(parse_key("D_incoming"), Some((Belief::Denying, Slot::Incoming)));
        assert_eq!(key(Belief::Susceptible, Slot::Cohort(4)), "S_4");
        assert_eq!(parse_key("S_0"), None);
        assert_eq!(parse_key("S_5"), None);
        assert_eq!(parse_key("X_1"), None);
        assert_eq!(parse_key("CS_1"), None);
        assert_eq!(parse_key("C1"), None);
    }

    #[test]
    fn incoming_falls_back_in_order() {
        let ic = InitialConditions::new().with("C_incoming", 0.5).with("S_1", 0.7);
        assert_eq!(ic.resolve_incoming(Belief::Committed), (0.5, Source::Explicit));
        assert_eq!(ic.resolve_incoming(Belief::Susceptible), (0.7, Source::FirstCohort));
        assert_eq!(ic.resolve_incoming(Belief::Denying), (DEFAULT_SHARE, Source::Default));
    }

    #[test]
    fn cohort_values_default_to_a_third() {
        let ic = InitialConditions::new().with("D_3", 0.9);
        assert_eq!(ic.resolve_cohort(Belief::Denying, 3), (0.9, Source::Explicit));
        assert_eq!(ic.resolve_cohort(Belief::Denying, 2), (DEFAULT_SHARE, Source::Default));
        assert_eq!(ic.cohort_weights(3), [DEFAULT_SHARE, DEFAULT_SHARE, 0.9]);
    }

    #[test]
    fn check_rejects_bad_keys_and_weights() {
        assert!(InitialConditions::new().with("Q_1", 0.1).check().is_err());
        assert!(InitialConditions::new().with("C_2", -0.1).check().is_err());
        assert!(InitialConditions::new().with("C_2", f64::INFINITY).check().is_err());
        assert!(InitialConditions::uniform([0.2, 0.6, 0.2]).check().is_ok());
    }
}
