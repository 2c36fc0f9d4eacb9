//! Market price data attached to outcomes.
//!
//! Presence is modelled as `Option<PriceInfo>` throughout the crate, so an
//! outcome with no market data is never confused with one that trades at 0.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ids::OutcomeId;

/// How much the price source trusts a listed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

/// Where a price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Market,
    Manual,
    Derived,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceInfo {
    /// Value in minor units, the unit all forecast math runs in.
    pub unit_value: f64,
    /// Value as shown to the user (typically in major units).
    #[serde(default)]
    pub display_value: f64,
    #[serde(default)]
    pub confidence: ConfidenceTier,
    #[serde(default)]
    pub source: PriceSource,
}

impl PriceInfo {
    pub fn market(unit_value: f64) -> Self {
        Self {
            unit_value,
            display_value: unit_value,
            confidence: ConfidenceTier::High,
            source: PriceSource::Market,
        }
    }
}

/// Prices keyed by outcome id. Outcomes absent from the table have no price.
pub type PriceTable = HashMap<OutcomeId, PriceInfo>;
