//! Blend weights for single-best selection.
//!
//! total = budget_weight * budget_score + frequency_weight * frequency_score
//!
//! Defaults are 0.6 / 0.4. They are configuration constants: loaded once from the
//! `[blend]` section of the ranking config and never derived from data.

use serde::Deserialize;

use crate::error::{RankError, Result};

pub const DEFAULT_BUDGET_WEIGHT: f32 = 0.6;
pub const DEFAULT_FREQUENCY_WEIGHT: f32 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct BlendWeights {
    #[serde(default = "default_budget_weight")]
    pub budget_weight: f32,
    #[serde(default = "default_frequency_weight")]
    pub frequency_weight: f32,
}

fn default_budget_weight() -> f32 {
    DEFAULT_BUDGET_WEIGHT
}
fn default_frequency_weight() -> f32 {
    DEFAULT_FREQUENCY_WEIGHT
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            budget_weight: DEFAULT_BUDGET_WEIGHT,
            frequency_weight: DEFAULT_FREQUENCY_WEIGHT,
        }
    }
}

impl BlendWeights {
    /// Weights must be finite, non-negative, and not both zero.
    pub fn validate(&self) -> Result<()> {
        let ok = |w: f32| w.is_finite() && w >= 0.0;
        if !ok(self.budget_weight) || !ok(self.frequency_weight) {
            return Err(RankError::InvalidInput(format!(
                "blend weights must be finite and >= 0 (budget {}, frequency {})",
                self.budget_weight, self.frequency_weight
            )));
        }
        if self.budget_weight + self.frequency_weight <= 0.0 {
            return Err(RankError::InvalidInput(
                "blend weights must not both be zero".into(),
            ));
        }
        Ok(())
    }

    pub fn total(&self, budget_score: f32, frequency_score: f32) -> f32 {
        self.budget_weight * budget_score + self.frequency_weight * frequency_score
    }
}
