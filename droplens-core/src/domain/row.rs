use serde::{Deserialize, Serialize};

use super::ids::OutcomeId;
use super::price::PriceInfo;

/// Derived forecast data for one outcome.
///
/// Static fields are fixed for a loaded snapshot + weight set. Dynamic fields
/// are rewritten in place by `ForecastEngine::recompute_dynamic`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub id: OutcomeId,
    pub tagged: bool,
    pub weight: f64,
    pub probability: f64,
    pub price: Option<PriceInfo>,
    pub has_price: bool,
    pub unit_value: f64,
    pub ev_contribution: f64,

    pub chance_in_batch: f64,
    pub expected_units: f64,
    pub cost_to_obtain: f64,
    pub pnl_outcome_only: f64,
    pub pnl_all_outcomes: f64,
}

