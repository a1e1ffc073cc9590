//! Balance factors and their weights.
//!
//! A weight set maps each balance factor to a non-negative weight and is
//! supplied by the caller (administrator-tunable). It is consumed by the
//! balance metrics and by the optimizer's acceptance rule.

use serde::{Deserialize, Serialize};

use crate::RosterError;

/// A factor the balance metrics score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceFactor {
    Gender,
    Academic,
    Behavioral,
    SpecialNeeds,
}

impl BalanceFactor {
    /// All factors, in scoring order.
    pub const ALL: [BalanceFactor; 4] = [
        BalanceFactor::Gender,
        BalanceFactor::Academic,
        BalanceFactor::Behavioral,
        BalanceFactor::SpecialNeeds,
    ];
}

/// Per-factor weights for the aggregate balance score.
///
/// Defaults to 1.0 everywhere (plain arithmetic mean of the sub-scores).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    pub gender: f64,
    pub academic: f64,
    pub behavioral: f64,
    pub special_needs: f64,
}

impl Default for WeightSet {
    fn default() -> Self {
        Self {
            gender: 1.0,
            academic: 1.0,
            behavioral: 1.0,
            special_needs: 1.0,
        }
    }
}

impl WeightSet {
    /// Creates the default weight set (all factors weighted equally).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gender weight.
    pub fn with_gender(mut self, weight: f64) -> Self {
        self.gender = weight;
        self
    }

    /// Sets the academic weight.
    pub fn with_academic(mut self, weight: f64) -> Self {
        self.academic = weight;
        self
    }

    /// Sets the behavioral weight.
    pub fn with_behavioral(mut self, weight: f64) -> Self {
        self.behavioral = weight;
        self
    }

    /// Sets the special-needs weight.
    pub fn with_special_needs(mut self, weight: f64) -> Self {
        self.special_needs = weight;
        self
    }

    /// The weight for a factor.
    pub fn get(&self, factor: BalanceFactor) -> f64 {
        match factor {
            BalanceFactor::Gender => self.gender,
            BalanceFactor::Academic => self.academic,
            BalanceFactor::Behavioral => self.behavioral,
            BalanceFactor::SpecialNeeds => self.special_needs,
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        BalanceFactor::ALL.iter().map(|&f| self.get(f)).sum()
    }

    /// Fails fast on a degenerate weight set: any negative weight, or all
    /// weights zero (the aggregate mean would be undefined).
    pub fn validate(&self) -> Result<(), RosterError> {
        for factor in BalanceFactor::ALL {
            let w = self.get(factor);
            if w < 0.0 {
                return Err(RosterError::InvalidWeights(format!(
                    "negative weight {w} for factor {factor:?}"
                )));
            }
        }
        if self.total() == 0.0 {
            return Err(RosterError::InvalidWeights(
                "all weights are zero".to_string(),
            ));
        }
        Ok(())
    }
}
