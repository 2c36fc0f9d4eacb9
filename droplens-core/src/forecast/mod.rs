//! Forecast engine: owns the current rows, snapshot and parameters.
//!
//! The engine is a plain owned struct with explicit steps:
//! 1. `load` rebuilds static row fields and runs a recompute
//! 2. setters change parameters without recomputing
//! 3. `recompute_dynamic` rewrites the dynamic row fields in place
//!
//! Keeping 2 and 3 apart lets a host coalesce a burst of parameter changes
//! (a slider drag) into one recompute. Nothing here returns an error:
//! degenerate inputs produce zeros, and `has_data` tells the host when to show
//! a "no data" state.

mod summary;

pub use summary::ForecastSummary;

use crate::domain::{ForecastRow, MarketSnapshot, Outcome, OutcomeId, PriceTable, PricedSnapshot};
use crate::outcome_set;
use crate::params::ForecastParams;
use crate::rate_model;

#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    rows: Vec<ForecastRow>,
    total_weight: f64,
    ev_per_unit: f64,
    snapshot: Option<MarketSnapshot>,
    base_rate: f64,
    params: ForecastParams,
}

impl ForecastEngine {
    pub fn new(params: ForecastParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Replace all rows with ones built from `outcomes` and `prices`, store the
    /// snapshot and recompute dynamic fields with the current parameters.
    pub fn load(&mut self, outcomes: &[Outcome], prices: &PriceTable, snapshot: Option<&MarketSnapshot>) {
        self.total_weight = outcome_set::total_weight(outcomes);
        self.rows = outcome_set::build_rows(outcomes, prices, self.total_weight);
        self.ev_per_unit = outcome_set::total_expected_value(&self.rows);
        self.snapshot = snapshot.cloned();
        self.base_rate = snapshot.map_or(0.0, |s| {
            rate_model::base_rate_from(s.value_ratio, s.unit_acquisition_cost)
        });

        tracing::debug!(
            outcomes = self.rows.len(),
            priced = self.rows.iter().filter(|r| r.has_price).count(),
            total_weight = self.total_weight,
            ev_per_unit = self.ev_per_unit,
            base_rate = self.base_rate,
            has_snapshot = self.snapshot.is_some(),
            "loaded forecast inputs"
        );

        self.recompute_dynamic();
    }

    /// [`load`](Self::load) from a provider's snapshot bundle. `None` loads
    /// the weights with no prices and no snapshot.
    pub fn load_priced(&mut self, outcomes: &[Outcome], priced: Option<&PricedSnapshot>) {
        match priced {
            Some(p) => self.load(outcomes, &p.prices, Some(&p.snapshot)),
            None => self.load(outcomes, &PriceTable::new(), None),
        }
    }

    /// Rewrite the dynamic fields of every row from the current state.
    ///
    /// Idempotent; row order and static fields are untouched.
    pub fn recompute_dynamic(&mut self) {
        let batch = self.params.selected_batch_size as f64;
        let value_ratio = self.value_ratio();
        let ev_per_unit = self.ev_per_unit;
        let base_rate = self.base_rate;
        let ForecastParams {
            rate_step_decay,
            sub_batch_size,
            ..
        } = self.params;

        for row in &mut self.rows {
            if row.probability > 0.0 {
                row.chance_in_batch = 1.0 - (1.0 - row.probability).powf(batch);
                row.expected_units = 1.0 / row.probability;
            } else {
                row.chance_in_batch = 0.0;
                row.expected_units = 0.0;
            }
            row.cost_to_obtain = rate_model::total_cost(
                row.expected_units,
                base_rate,
                rate_step_decay,
                sub_batch_size,
                value_ratio,
            );
            if row.has_price {
                row.pnl_outcome_only = row.unit_value - row.cost_to_obtain;
                row.pnl_all_outcomes = row.expected_units * ev_per_unit - row.cost_to_obtain;
            } else {
                row.pnl_outcome_only = 0.0;
                row.pnl_all_outcomes = 0.0;
            }
        }

        tracing::trace!(
            rows = self.rows.len(),
            batch = self.params.selected_batch_size,
            "recomputed dynamic fields"
        );
    }

    // ── Parameters ───────────────────────────────────────────────────

    pub fn params(&self) -> &ForecastParams {
        &self.params
    }

    pub fn set_params(&mut self, params: ForecastParams) {
        self.params = params;
    }

    pub fn set_selected_batch_size(&mut self, batch_size: u64) {
        self.params.selected_batch_size = batch_size;
    }

    pub fn set_rate_step_decay(&mut self, step_decay: f64) {
        self.params.rate_step_decay = step_decay;
    }

    pub fn set_sub_batch_size(&mut self, sub_batch_size: f64) {
        self.params.sub_batch_size = sub_batch_size;
    }

    pub fn set_min_price_filter(&mut self, min_price: f64) {
        self.params.min_price_filter = min_price;
    }

    // ── Rows ─────────────────────────────────────────────────────────

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn row(&self, id: &OutcomeId) -> Option<&ForecastRow> {
        self.rows.iter().find(|r| &r.id == id)
    }

    /// Rows that are unpriced or priced at or above `min_price`.
    ///
    /// Missing market data is never treated as "below threshold". A
    /// non-finite threshold filters nothing.
    pub fn filtered_rows(&self, min_price: f64) -> Vec<&ForecastRow> {
        let min_price = if min_price.is_finite() { min_price } else { f64::NEG_INFINITY };
        self.rows
            .iter()
            .filter(|r| !r.has_price || r.unit_value >= min_price)
            .collect()
    }

    /// [`filtered_rows`](Self::filtered_rows) with the configured filter.
    pub fn visible_rows(&self) -> Vec<&ForecastRow> {
        self.filtered_rows(self.params.min_price_filter)
    }

    // ── State ────────────────────────────────────────────────────────

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn ev_per_unit(&self) -> f64 {
        self.ev_per_unit
    }

    pub fn snapshot(&self) -> Option<&MarketSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn base_rate(&self) -> f64 {
        self.base_rate
    }

    /// True once weights with a positive total and a snapshot are loaded.
    pub fn has_data(&self) -> bool {
        self.total_weight > 0.0 && self.snapshot.is_some()
    }

    fn value_ratio(&self) -> f64 {
        self.snapshot.as_ref().map_or(0.0, |s| s.value_ratio)
    }

    fn is_loaded(&self) -> bool {
        self.snapshot.is_some() && !self.rows.is_empty()
    }

    // ── Aggregates ───────────────────────────────────────────────────

    /// Cost in minor units of buying the selected batch.
    pub fn total_cost(&self) -> f64 {
        if !self.is_loaded() {
            return 0.0;
        }
        rate_model::total_cost(
            self.params.selected_batch_size as f64,
            self.base_rate,
            self.params.rate_step_decay,
            self.params.sub_batch_size,
            self.value_ratio(),
        )
    }

    /// Expected market value of the selected batch.
    pub fn total_revenue(&self) -> f64 {
        if !self.is_loaded() {
            return 0.0;
        }
        self.ev_per_unit * self.params.selected_batch_size as f64
    }

    pub fn net_pnl(&self) -> f64 {
        self.total_revenue() - self.total_cost()
    }

    /// Lowest draws-per-major-unit rate at which a draw pays for itself.
    /// Independent of the batch size.
    pub fn break_even_rate(&self) -> f64 {
        if !self.is_loaded() || self.ev_per_unit <= 0.0 {
            return 0.0;
        }
        self.value_ratio() / self.ev_per_unit
    }

    pub fn avg_cost_per_unit(&self) -> f64 {
        match self.params.selected_batch_size {
            0 => 0.0,
            n => self.total_cost() / n as f64,
        }
    }

    /// Rate applied to sub-batch `index`; [`rate_model::RATE_FLOOR`] when no
    /// base rate is known.
    pub fn rate_for_sub_batch_index(&self, index: u64) -> f64 {
        rate_model::rate_for_sub_batch(self.base_rate, index, self.params.rate_step_decay)
    }

    /// Per-chunk cost breakdown of the selected batch.
    pub fn batch_breakdown(&self) -> Vec<rate_model::SubBatchCost> {
        if !self.is_loaded() {
            return Vec::new();
        }
        rate_model::sub_batch_breakdown(
            self.params.selected_batch_size as f64,
            self.base_rate,
            self.params.rate_step_decay,
            self.params.sub_batch_size,
            self.value_ratio(),
        )
    }

    pub fn summary(&self) -> ForecastSummary {
        ForecastSummary::from_engine(self)
    }
}
