//! Sliding-rate cost model for bulk purchases.
//!
//! Buying draw-units in bulk walks the exchange rate down: the first
//! `sub_batch_size` units trade at the base rate, the next chunk at
//! `base_rate - step_decay`, and so on, never below [`RATE_FLOOR`].
//!
//! Costs are expressed in minor units: a chunk of `n` units bought at `rate`
//! units per major unit costs `n * (value_ratio / rate)`.

use serde::{Deserialize, Serialize};

/// Worst-case exchange rate the model will ever assume.
pub const RATE_FLOOR: f64 = 60.0;

/// Exchange rate for the zero-based `sub_batch_index`.
///
/// `max(RATE_FLOOR, base_rate - sub_batch_index * step_decay)`.
pub fn rate_for_sub_batch(base_rate: f64, sub_batch_index: u64, step_decay: f64) -> f64 {
    (base_rate - sub_batch_index as f64 * step_decay).max(RATE_FLOOR)
}

/// Base rate implied by a snapshot: draw-units obtainable per major unit.
///
/// Floored at [`RATE_FLOOR`] with no upper clamp. Returns 0 when the
/// acquisition cost is not positive.
pub fn base_rate_from(value_ratio: f64, unit_acquisition_cost: f64) -> f64 {
    if unit_acquisition_cost.is_nan() || unit_acquisition_cost <= 0.0 {
        return 0.0;
    }
    (value_ratio / unit_acquisition_cost).floor().max(RATE_FLOOR)
}

/// Total cost in minor units of acquiring `total_units` (may be fractional).
///
/// Returns 0 for non-positive or non-finite `total_units`, `value_ratio` or
/// `base_rate`. Chunks are summed in ascending sub-batch order.
pub fn total_cost(
    total_units: f64,
    base_rate: f64,
    step_decay: f64,
    sub_batch_size: f64,
    value_ratio: f64,
) -> f64 {
    SubBatches::new(total_units, base_rate, step_decay, sub_batch_size, value_ratio)
        .fold(0.0, |acc, chunk| acc + chunk.cost)
}

/// Rates for the first `count` sub-batches.
pub fn rate_ladder(base_rate: f64, step_decay: f64, count: usize) -> Vec<f64> {
    (0..count as u64)
        .map(|i| rate_for_sub_batch(base_rate, i, step_decay))
        .collect()
}

/// One priced chunk of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubBatchCost {
    pub index: u64,
    pub units: f64,
    pub rate: f64,
    pub cost: f64,
    /// `units` covers the whole rest of the batch at this chunk's rate.
    pub flat_tail: bool,
}

/// Per-chunk breakdown of [`total_cost`]. The chunk costs sum to exactly the
/// same value `total_cost` returns.
pub fn sub_batch_breakdown(
    total_units: f64,
    base_rate: f64,
    step_decay: f64,
    sub_batch_size: f64,
    value_ratio: f64,
) -> Vec<SubBatchCost> {
    SubBatches::new(total_units, base_rate, step_decay, sub_batch_size, value_ratio).collect()
}

/// Chunks summed one by one before the remainder is priced as a single tail.
const MAX_ITERATED_CHUNKS: u64 = 1_000_000;

/// Walks a batch chunk by chunk in ascending index order.
///
/// The remainder is emitted as one tail chunk only when more than
/// [`MAX_ITERATED_CHUNKS`] chunks would still follow at a rate that can no
/// longer change, or once that many chunks have been emitted.
struct SubBatches {
    remaining: f64,
    index: u64,
    base_rate: f64,
    step: f64,
    chunk_size: f64,
    value_ratio: f64,
}

impl SubBatches {
    fn new(
        total_units: f64,
        base_rate: f64,
        step_decay: f64,
        sub_batch_size: f64,
        value_ratio: f64,
    ) -> Self {
        let valid = total_units.is_finite()
            && total_units > 0.0
            && value_ratio.is_finite()
            && value_ratio > 0.0
            && base_rate.is_finite()
            && base_rate > 0.0;
        let chunk_size = if sub_batch_size.is_finite() && sub_batch_size > 0.0 {
            sub_batch_size
        } else {
            total_units
        };
        Self {
            remaining: if valid { total_units } else { 0.0 },
            index: 0,
            base_rate,
            step: if step_decay.is_finite() { step_decay } else { 0.0 },
            chunk_size,
            value_ratio,
        }
    }
}

impl Iterator for SubBatches {
    type Item = SubBatchCost;

    fn next(&mut self) -> Option<SubBatchCost> {
        if self.remaining <= 0.0 {
            return None;
        }
        let rate = rate_for_sub_batch(self.base_rate, self.index, self.step);
        let rate_fixed = self.step == 0.0 || (self.step > 0.0 && rate <= RATE_FLOOR);
        let flat_tail = self.index >= MAX_ITERATED_CHUNKS
            || (rate_fixed && self.remaining > self.chunk_size * MAX_ITERATED_CHUNKS as f64);
        let units = if flat_tail {
            self.remaining
        } else {
            self.remaining.min(self.chunk_size)
        };
        let chunk = SubBatchCost {
            index: self.index,
            units,
            rate,
            cost: units * (self.value_ratio / rate),
            flat_tail,
        };
        self.remaining = if flat_tail { 0.0 } else { self.remaining - units };
        self.index += 1;
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn rate_degrades_by_step() {
        assert_eq!(rate_for_sub_batch(90.0, 0, 2.0), 90.0);
        assert_eq!(rate_for_sub_batch(90.0, 1, 2.0), 88.0);
        assert_eq!(rate_for_sub_batch(90.0, 5, 2.0), 80.0);
    }

    #[test]
    fn rate_clamps_at_floor() {
        assert_eq!(rate_for_sub_batch(90.0, 100, 2.0), RATE_FLOOR);
        assert_eq!(rate_for_sub_batch(0.0, 0, 2.0), RATE_FLOOR);
        assert_eq!(rate_for_sub_batch(40.0, 0, 0.0), RATE_FLOOR);
    }

    #[test]
    fn negative_step_raises_rate() {
        assert_eq!(rate_for_sub_batch(90.0, 3, -2.0), 96.0);
        assert_eq!(rate_for_sub_batch(40.0, 5, -2.0), 60.0);
        assert_eq!(rate_ladder(90.0, -2.0, 3), vec![90.0, 92.0, 94.0]);
    }

    #[test]
    fn negative_step_cost_uses_rising_rates() {
        let cost = total_cost(10000.0, 90.0, -2.0, 5000.0, 200.0);
        let expected = 5000.0 * (200.0 / 90.0) + 5000.0 * (200.0 / 92.0);
        assert!(close(cost, expected));
    }

    #[test]
    fn base_rate_floors_division() {
        assert_eq!(base_rate_from(200.0, 2.22), 90.0);
    }

    #[test]
    fn base_rate_clamps_low_values_to_floor() {
        // 200 / 10 = 20 < 60
        assert_eq!(base_rate_from(200.0, 10.0), RATE_FLOOR);
    }

    #[test]
    fn base_rate_has_no_ceiling() {
        assert_eq!(base_rate_from(200.0, 0.5), 400.0);
    }

    #[test]
    fn base_rate_zero_for_non_positive_cost() {
        assert_eq!(base_rate_from(200.0, 0.0), 0.0);
        assert_eq!(base_rate_from(200.0, -1.0), 0.0);
    }

    #[test]
    fn single_sub_batch() {
        let cost = total_cost(5000.0, 90.0, 2.0, 5000.0, 200.0);
        assert!(close(cost, 5000.0 * (200.0 / 90.0)));
    }

    #[test]
    fn two_sub_batches() {
        let cost = total_cost(10000.0, 90.0, 2.0, 5000.0, 200.0);
        let expected = 5000.0 * (200.0 / 90.0) + 5000.0 * (200.0 / 88.0);
        assert!(close(cost, expected));
    }

    #[test]
    fn fractional_remainder_is_priced_at_next_rate() {
        let cost = total_cost(706.5, 90.0, 2.0, 500.0, 200.0);
        let expected = 500.0 * (200.0 / 90.0) + 206.5 * (200.0 / 88.0);
        assert!(close(cost, expected));
    }

    #[test]
    fn degenerate_inputs_cost_nothing() {
        assert_eq!(total_cost(0.0, 90.0, 2.0, 5000.0, 200.0), 0.0);
        assert_eq!(total_cost(-5.0, 90.0, 2.0, 5000.0, 200.0), 0.0);
        assert_eq!(total_cost(100.0, 90.0, 2.0, 5000.0, 0.0), 0.0);
        assert_eq!(total_cost(100.0, 90.0, 2.0, 5000.0, -200.0), 0.0);
        assert_eq!(total_cost(100.0, 0.0, 2.0, 5000.0, 200.0), 0.0);
        assert_eq!(total_cost(f64::INFINITY, 90.0, 2.0, 5000.0, 200.0), 0.0);
        assert_eq!(total_cost(f64::NAN, 90.0, 2.0, 5000.0, 200.0), 0.0);
    }

    #[test]
    fn zero_sub_batch_size_is_one_chunk() {
        let cost = total_cost(12_000.0, 90.0, 2.0, 0.0, 200.0);
        assert!(close(cost, 12_000.0 * (200.0 / 90.0)));
    }

    #[test]
    fn floor_tail_matches_chunk_by_chunk_sum() {
        // 90 -> 60 takes 15 steps; 40 chunks in total.
        let units = 40.0 * 100.0;
        let cost = total_cost(units, 90.0, 2.0, 100.0, 200.0);
        let mut expected = 0.0;
        for i in 0..40u64 {
            let rate = (90.0 - i as f64 * 2.0).max(RATE_FLOOR);
            expected += 100.0 * (200.0 / rate);
        }
        assert!(close(cost, expected));
    }

    /// Plain ascending loop, one term per chunk.
    fn chunk_loop(units: f64, base: f64, step: f64, sub: f64, ratio: f64) -> f64 {
        let mut remaining = units;
        let mut index = 0u64;
        let mut cost = 0.0;
        while remaining > 0.0 {
            let chunk = remaining.min(sub);
            let rate = (base - index as f64 * step).max(RATE_FLOOR);
            cost += chunk * (ratio / rate);
            remaining -= chunk;
            index += 1;
        }
        cost
    }

    #[test]
    fn total_cost_is_bit_identical_to_chunk_loop() {
        let cases = [
            // zero step
            (10_000.0, 90.0, 0.0, 100.0, 200.0),
            (12_345.5, 75.0, 0.0, 250.0, 180.0),
            // reaches the floor partway through
            (10_000.0, 90.0, 2.0, 100.0, 200.0),
            (98_765.25, 64.0, 2.0, 1000.0, 200.0),
            (50_000.0, 90.0, 7.5, 333.0, 123.4),
            // starts at the floor
            (10_000.0, 40.0, 2.0, 100.0, 200.0),
            // never reaches the floor
            (23_500.0, 90.0, 2.0, 5000.0, 200.0),
        ];
        for (units, base, step, sub, ratio) in cases {
            let cost = total_cost(units, base, step, sub, ratio);
            let expected = chunk_loop(units, base, step, sub, ratio);
            assert_eq!(
                cost.to_bits(),
                expected.to_bits(),
                "units={units} base={base} step={step} sub={sub}: {cost:e} vs {expected:e}"
            );
        }
    }

    #[test]
    fn huge_unit_counts_terminate() {
        let cost = total_cost(1e15, 90.0, 2.0, 5000.0, 200.0);
        assert!(cost.is_finite());
        assert!(cost > 1e15 * (200.0 / 90.0));
    }

    #[test]
    fn breakdown_sums_to_total() {
        let chunks = sub_batch_breakdown(23_500.0, 90.0, 2.0, 5000.0, 200.0);
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[4].units, 3500.0);
        assert_eq!(chunks[4].rate, 82.0);
        let sum = chunks.iter().fold(0.0, |acc, c| acc + c.cost);
        assert_eq!(sum, total_cost(23_500.0, 90.0, 2.0, 5000.0, 200.0));
    }

    #[test]
    fn breakdown_lists_every_floor_chunk() {
        let chunks = sub_batch_breakdown(10_000.0, 64.0, 2.0, 1000.0, 200.0);
        assert_eq!(chunks.len(), 10);
        assert!(chunks.iter().all(|c| !c.flat_tail));
        assert_eq!(chunks[9].rate, RATE_FLOOR);
    }

    #[test]
    fn breakdown_aggregates_long_floor_tail() {
        let chunks = sub_batch_breakdown(1e12, 64.0, 2.0, 1000.0, 200.0);
        // 64, 62, then floor at index 2 with ~1e9 chunks left
        assert_eq!(chunks.len(), 3);
        assert!(!chunks[1].flat_tail);
        assert!(chunks[2].flat_tail);
        assert_eq!(chunks[2].rate, RATE_FLOOR);
        assert_eq!(chunks[2].units, 1e12 - 2000.0);
    }

    #[test]
    fn ladder_lists_rates() {
        assert_eq!(rate_ladder(66.0, 2.0, 5), vec![66.0, 64.0, 62.0, 60.0, 60.0]);
        assert!(rate_ladder(90.0, 2.0, 0).is_empty());
    }
}
