//! Property tests for forecast invariants.
//!
//! Uses proptest to verify:
//! 1. Probability normalization: probabilities sum to 1 for positive weights
//! 2. Rate floor: no sub-batch is ever priced below the floor
//! 3. Cost monotonicity: in units, step decay and sub-batch size
//! 4. Break-even independence: batch size never moves the break-even rate
//! 5. Filter invariant: unpriced rows survive every threshold
//! 6. Idempotent recompute: a second recompute changes nothing

use proptest::prelude::*;
use droplens_core::outcome_set::{build_rows, total_weight};
use droplens_core::rate_model::{rate_for_sub_batch, sub_batch_breakdown, total_cost, RATE_FLOOR};
use droplens_core::{ForecastEngine, MarketSnapshot, Outcome, OutcomeId, PriceInfo, PriceTable};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_weights() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..1000.0_f64, 1..60)
}

/// Outcomes with a price for roughly two thirds of them.
fn arb_market() -> impl Strategy<Value = (Vec<Outcome>, PriceTable)> {
    prop::collection::vec((0.01..1000.0_f64, prop::option::weighted(0.66, 0.0..100_000.0_f64)), 1..40)
        .prop_map(|entries| {
            let mut outcomes = Vec::new();
            let mut prices = PriceTable::new();
            for (i, (weight, price)) in entries.into_iter().enumerate() {
                let id = format!("outcome-{i}");
                if let Some(p) = price {
                    prices.insert(OutcomeId::new(id.clone()), PriceInfo::market(p));
                }
                outcomes.push(Outcome::new(id, weight));
            }
            (outcomes, prices)
        })
}

fn arb_snapshot() -> impl Strategy<Value = MarketSnapshot> {
    (50.0..500.0_f64, 0.5..5.0_f64).prop_map(|(ratio, cost)| MarketSnapshot::new(ratio, cost))
}

fn load(outcomes: &[Outcome], prices: &PriceTable, snapshot: &MarketSnapshot) -> ForecastEngine {
    let mut engine = ForecastEngine::default();
    engine.load(outcomes, prices, Some(snapshot));
    engine
}

// ── 1. Probability normalization ─────────────────────────────────────

proptest! {
    #[test]
    fn probabilities_sum_to_one(weights in arb_weights()) {
        let outcomes: Vec<Outcome> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| Outcome::new(format!("o{i}"), *w))
            .collect();
        let total = total_weight(&outcomes);
        let rows = build_rows(&outcomes, &PriceTable::new(), total);
        let sum: f64 = rows.iter().map(|r| r.probability).sum();

        if total > 0.0 {
            prop_assert!((sum - 1.0).abs() < 1e-8, "sum = {}", sum);
        } else {
            prop_assert_eq!(sum, 0.0);
        }
    }
}

// ── 2. Rate floor ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rate_never_below_floor(
        base in -100.0..1000.0_f64,
        index in 0u64..100_000,
        step in 0.0..50.0_f64,
    ) {
        let rate = rate_for_sub_batch(base, index, step);
        prop_assert!(rate >= RATE_FLOOR);
        prop_assert!(rate.is_finite());
    }

    #[test]
    fn breakdown_rates_respect_floor(
        units in 1.0..1_000_000.0_f64,
        base in 60.0..200.0_f64,
        step in 0.0..10.0_f64,
        sub in 100.0..10_000.0_f64,
    ) {
        for chunk in sub_batch_breakdown(units, base, step, sub, 200.0) {
            prop_assert!(chunk.rate >= RATE_FLOOR);
            prop_assert!(chunk.units > 0.0);
        }
    }
}

// ── 3. Cost monotonicity ─────────────────────────────────────────────

proptest! {
    #[test]
    fn cost_increases_with_units(
        u1 in 0.1..100_000.0_f64,
        extra in 0.1..100_000.0_f64,
        base in 60.0..200.0_f64,
        step in 0.0..10.0_f64,
        sub in 100.0..10_000.0_f64,
        ratio in 1.0..500.0_f64,
    ) {
        let u2 = u1 + extra;
        prop_assert!(total_cost(u1, base, step, sub, ratio) < total_cost(u2, base, step, sub, ratio));
    }

    #[test]
    fn cost_non_decreasing_in_step_decay(
        units in 1.0..200_000.0_f64,
        base in 60.0..200.0_f64,
        step in 0.0..10.0_f64,
        extra_step in 0.0..10.0_f64,
        sub in 100.0..10_000.0_f64,
    ) {
        let low = total_cost(units, base, step, sub, 200.0);
        let high = total_cost(units, base, step + extra_step, sub, 200.0);
        prop_assert!(high >= low * (1.0 - 1e-12), "low = {}, high = {}", low, high);
    }

    #[test]
    fn cost_non_increasing_in_sub_batch_size(
        units in 1.0..200_000.0_f64,
        base in 60.0..200.0_f64,
        step in 0.0..10.0_f64,
        sub in 100.0..10_000.0_f64,
        extra_sub in 0.0..10_000.0_f64,
    ) {
        let small = total_cost(units, base, step, sub, 200.0);
        let large = total_cost(units, base, step, sub + extra_sub, 200.0);
        prop_assert!(large <= small * (1.0 + 1e-12), "small = {}, large = {}", small, large);
    }
}

// ── 4. Break-even independence ───────────────────────────────────────

proptest! {
    #[test]
    fn break_even_ignores_batch_size(
        (outcomes, prices) in arb_market(),
        snapshot in arb_snapshot(),
        b1 in 0u64..100_000,
        b2 in 0u64..100_000,
    ) {
        let mut engine = load(&outcomes, &prices, &snapshot);
        engine.set_selected_batch_size(b1);
        engine.recompute_dynamic();
        let first = engine.break_even_rate();

        engine.set_selected_batch_size(b2);
        engine.recompute_dynamic();
        prop_assert_eq!(engine.break_even_rate(), first);
    }
}

// ── 5. Filter invariant ──────────────────────────────────────────────

proptest! {
    #[test]
    fn filter_keeps_every_unpriced_row(
        (outcomes, prices) in arb_market(),
        snapshot in arb_snapshot(),
        threshold in -1e9..1e12_f64,
    ) {
        let engine = load(&outcomes, &prices, &snapshot);
        let unpriced = engine.rows().iter().filter(|r| !r.has_price).count();
        let kept = engine.filtered_rows(threshold);

        prop_assert_eq!(kept.iter().filter(|r| !r.has_price).count(), unpriced);
        for row in kept.iter().filter(|r| r.has_price) {
            prop_assert!(row.unit_value >= threshold);
        }
    }
}

// ── 6. Idempotent recompute ──────────────────────────────────────────

proptest! {
    #[test]
    fn recompute_is_idempotent(
        (outcomes, prices) in arb_market(),
        snapshot in arb_snapshot(),
        batch in 0u64..50_000,
        step in 0.0..10.0_f64,
        sub in 1.0..10_000.0_f64,
    ) {
        let mut engine = load(&outcomes, &prices, &snapshot);
        engine.set_selected_batch_size(batch);
        engine.set_rate_step_decay(step);
        engine.set_sub_batch_size(sub);

        engine.recompute_dynamic();
        let first = engine.rows().to_vec();
        engine.recompute_dynamic();

        for (a, b) in first.iter().zip(engine.rows()) {
            prop_assert_eq!(a.chance_in_batch.to_bits(), b.chance_in_batch.to_bits());
            prop_assert_eq!(a.expected_units.to_bits(), b.expected_units.to_bits());
            prop_assert_eq!(a.cost_to_obtain.to_bits(), b.cost_to_obtain.to_bits());
            prop_assert_eq!(a.pnl_outcome_only.to_bits(), b.pnl_outcome_only.to_bits());
            prop_assert_eq!(a.pnl_all_outcomes.to_bits(), b.pnl_all_outcomes.to_bits());
        }
    }

    #[test]
    fn dynamic_fields_stay_in_range(
        (outcomes, prices) in arb_market(),
        snapshot in arb_snapshot(),
        batch in 0u64..50_000,
    ) {
        let mut engine = load(&outcomes, &prices, &snapshot);
        engine.set_selected_batch_size(batch);
        engine.recompute_dynamic();

        for row in engine.rows() {
            prop_assert!((0.0..=1.0).contains(&row.chance_in_batch));
            prop_assert!(row.expected_units >= 0.0);
            prop_assert!(row.cost_to_obtain >= 0.0);
        }
    }
}
