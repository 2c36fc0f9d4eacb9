//! Static per-outcome fields: probability and expected-value contribution.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::domain::{ForecastRow, Outcome, PriceTable};

/// Sum of effective (sanitized) weights.
pub fn total_weight(outcomes: &[Outcome]) -> f64 {
    outcomes.iter().map(Outcome::effective_weight).sum()
}

/// Build one row per outcome, in input order. Dynamic fields start at 0.
pub fn build_rows(outcomes: &[Outcome], prices: &PriceTable, total_weight: f64) -> Vec<ForecastRow> {
    outcomes
        .iter()
        .map(|outcome| {
            let probability = if total_weight > 0.0 {
                outcome.effective_weight() / total_weight
            } else {
                0.0
            };
            let price = prices.get(&outcome.id).cloned();
            let unit_value = price.as_ref().map_or(0.0, |p| p.unit_value);
            let ev_contribution = if price.is_some() {
                probability * unit_value
            } else {
                0.0
            };
            ForecastRow {
                id: outcome.id.clone(),
                tagged: outcome.tagged,
                weight: outcome.weight,
                probability,
                has_price: price.is_some(),
                price,
                unit_value,
                ev_contribution,
                chance_in_batch: 0.0,
                expected_units: 0.0,
                cost_to_obtain: 0.0,
                pnl_outcome_only: 0.0,
                pnl_all_outcomes: 0.0,
            }
        })
        .collect()
}

/// Expected market value of a single draw: sum of priced contributions.
pub fn total_expected_value(rows: &[ForecastRow]) -> f64 {
    rows.iter()
        .filter(|r| r.has_price)
        .map(|r| r.ev_contribution)
        .sum()
}

/// Column to order rows by for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    EvContribution,
    Probability,
    ChanceInBatch,
    UnitValue,
    /// Cheapest first.
    CostToObtain,
    PnlOutcomeOnly,
    PnlAllOutcomes,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ev" | "ev_contribution" => Some(Self::EvContribution),
            "probability" | "prob" => Some(Self::Probability),
            "chance" | "chance_in_batch" => Some(Self::ChanceInBatch),
            "value" | "unit_value" => Some(Self::UnitValue),
            "cost" | "cost_to_obtain" => Some(Self::CostToObtain),
            "pnl" | "pnl_outcome_only" => Some(Self::PnlOutcomeOnly),
            "pnl_all" | "pnl_all_outcomes" => Some(Self::PnlAllOutcomes),
            _ => None,
        }
    }

    fn value(self, row: &ForecastRow) -> f64 {
        match self {
            Self::EvContribution => row.ev_contribution,
            Self::Probability => row.probability,
            Self::ChanceInBatch => row.chance_in_batch,
            Self::UnitValue => row.unit_value,
            Self::CostToObtain => row.cost_to_obtain,
            Self::PnlOutcomeOnly => row.pnl_outcome_only,
            Self::PnlAllOutcomes => row.pnl_all_outcomes,
        }
    }
}

/// Stable sort, descending by `key` (ascending for [`SortKey::CostToObtain`]),
/// ties broken by outcome id.
pub fn sort_rows<R: Borrow<ForecastRow>>(rows: &mut [R], key: SortKey) {
    rows.sort_by(|a, b| {
        let (a, b): (&ForecastRow, &ForecastRow) = (a.borrow(), b.borrow());
        let primary = match key {
            SortKey::CostToObtain => key.value(a).total_cmp(&key.value(b)),
            _ => key.value(b).total_cmp(&key.value(a)),
        };
        match primary {
            Ordering::Equal => a.id.cmp(&b.id),
            other => other,
        }
    });
}
