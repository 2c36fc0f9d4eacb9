use serde::{Deserialize, Serialize};

use super::ids::OutcomeId;

/// One possible result of the randomized action, with its relative weight.
///
/// Weights are arbitrary non-negative frequencies and need not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: OutcomeId,
    pub weight: f64,
    #[serde(default)]
    pub tagged: bool,
}

impl Outcome {
    pub fn new(id: impl Into<String>, weight: f64) -> Self {
        Self {
            id: OutcomeId::new(id),
            weight,
            tagged: false,
        }
    }

    pub fn tagged(mut self) -> Self {
        self.tagged = true;
        self
    }

    /// Weight as used in probability math: negative or non-finite counts as 0.
    pub fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            0.0
        }
    }
}
