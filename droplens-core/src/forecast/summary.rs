use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ForecastEngine;
use crate::params::ForecastParams;

/// Batch-level figures for summary widgets and JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub has_data: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    pub params: ForecastParams,
    pub value_ratio: f64,
    pub base_rate: f64,
    pub ev_per_unit: f64,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub net_pnl: f64,
    pub break_even_rate: f64,
    pub avg_cost_per_unit: f64,
    pub outcome_count: usize,
    pub priced_count: usize,
    pub visible_count: usize,
}

impl ForecastSummary {
    pub(super) fn from_engine(engine: &ForecastEngine) -> Self {
        let snapshot = engine.snapshot();
        Self {
            has_data: engine.has_data(),
            fetched_at: snapshot.map(|s| s.fetched_at),
            params: *engine.params(),
            value_ratio: snapshot.map_or(0.0, |s| s.value_ratio),
            base_rate: engine.base_rate(),
            ev_per_unit: engine.ev_per_unit(),
            total_cost: engine.total_cost(),
            total_revenue: engine.total_revenue(),
            net_pnl: engine.net_pnl(),
            break_even_rate: engine.break_even_rate(),
            avg_cost_per_unit: engine.avg_cost_per_unit(),
            outcome_count: engine.rows().len(),
            priced_count: engine.rows().iter().filter(|r| r.has_price).count(),
            visible_count: engine.visible_rows().len(),
        }
    }

    /// True when buying the batch is expected to return more than it costs.
    pub fn is_profitable(&self) -> bool {
        self.has_data && self.net_pnl > 0.0
    }
}
