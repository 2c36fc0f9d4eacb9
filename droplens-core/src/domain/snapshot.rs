use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::price::PriceTable;

/// Exchange and cost data captured at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub fetched_at: DateTime<Utc>,
    /// Minor units per major unit (expected > 0).
    pub value_ratio: f64,
    /// Cost of performing one action, in major units.
    pub unit_acquisition_cost: f64,
}

impl MarketSnapshot {
    pub fn new(value_ratio: f64, unit_acquisition_cost: f64) -> Self {
        Self {
            fetched_at: Utc::now(),
            value_ratio,
            unit_acquisition_cost,
        }
    }
}

/// Snapshot together with the prices fetched alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedSnapshot {
    #[serde(flatten)]
    pub snapshot: MarketSnapshot,
    #[serde(default)]
    pub prices: PriceTable,
}
