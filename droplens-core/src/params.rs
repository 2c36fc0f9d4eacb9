//! Tunable forecast parameters.

use serde::{Deserialize, Serialize};

/// Parameters a host adjusts interactively (batch slider, rate sliders,
/// price filter). Changing them never triggers a recompute by itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastParams {
    /// Number of draws in the batch being planned.
    pub selected_batch_size: u64,
    /// Rate lost per completed sub-batch.
    pub rate_step_decay: f64,
    /// Draws bought at one rate before it degrades.
    pub sub_batch_size: f64,
    /// Rows with a known price below this are hidden.
    pub min_price_filter: f64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            selected_batch_size: 1000,
            rate_step_decay: 2.0,
            sub_batch_size: 5000.0,
            min_price_filter: 0.0,
        }
    }
}

/// Optional per-field overrides, e.g. from command-line flags.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParamOverrides {
    pub selected_batch_size: Option<u64>,
    pub rate_step_decay: Option<f64>,
    pub sub_batch_size: Option<f64>,
    pub min_price_filter: Option<f64>,
}

impl ParamOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ForecastParams {
    /// Returns a copy with every `Some` override applied.
    pub fn with_overrides(mut self, overrides: &ParamOverrides) -> Self {
        if let Some(v) = overrides.selected_batch_size {
            self.selected_batch_size = v;
        }
        if let Some(v) = overrides.rate_step_decay {
            self.rate_step_decay = v;
        }
        if let Some(v) = overrides.sub_batch_size {
            self.sub_batch_size = v;
        }
        if let Some(v) = overrides.min_price_filter {
            self.min_price_filter = v;
        }
        self
    }
}
