//! Plain-text tables for terminal output.
//!
//! Figures that have no meaning without market data render as `-`.

use droplens_core::rate_model::SubBatchCost;
use droplens_core::{ContextKey, ForecastEngine, ForecastRow, ForecastSummary};

const NO_DATA: &str = "-";

fn money(v: f64) -> String {
    format!("{v:.2}")
}

fn percent(v: f64) -> String {
    format!("{:.2}%", v * 100.0)
}

fn priced(row: &ForecastRow, v: f64) -> String {
    if row.has_price {
        money(v)
    } else {
        NO_DATA.to_string()
    }
}

pub fn summary_block(context: &ContextKey, s: &ForecastSummary) -> String {
    let mut out = format!("Context: {context}\n");
    if !s.has_data {
        out.push_str("No market data loaded for this context.\n");
    }
    let fig = |v: f64| if s.has_data { money(v) } else { NO_DATA.to_string() };
    let fetched = s
        .fetched_at
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| NO_DATA.to_string());

    out.push_str(&format!("Snapshot:            {fetched}\n"));
    out.push_str(&format!(
        "Batch:               {} draws (sub-batch {}, step {})\n",
        s.params.selected_batch_size, s.params.sub_batch_size, s.params.rate_step_decay
    ));
    out.push_str(&format!("Base rate:           {}\n", fig(s.base_rate)));
    out.push_str(&format!("EV per draw:         {}\n", fig(s.ev_per_unit)));
    out.push_str(&format!("Total cost:          {}\n", fig(s.total_cost)));
    out.push_str(&format!("Total revenue:       {}\n", fig(s.total_revenue)));
    out.push_str(&format!("Net P&L:             {}\n", fig(s.net_pnl)));
    out.push_str(&format!("Avg cost per draw:   {}\n", fig(s.avg_cost_per_unit)));
    out.push_str(&format!("Break-even rate:     {}\n", fig(s.break_even_rate)));
    out.push_str(&format!(
        "Outcomes:            {} ({} priced, {} shown)\n",
        s.outcome_count, s.priced_count, s.visible_count
    ));
    out
}

pub fn rows_table(rows: &[&ForecastRow]) -> String {
    let mut out = format!(
        "{:<32} {:>10} {:>12} {:>10} {:>12} {:>14} {:>14} {:>14}\n",
        "Outcome", "Prob", "Value", "In batch", "Exp. draws", "Cost", "P&L (own)", "P&L (all)"
    );
    out.push_str(&"-".repeat(124));
    out.push('\n');
    for row in rows {
        let name = if row.tagged {
            format!("* {}", row.id)
        } else {
            row.id.to_string()
        };
        out.push_str(&format!(
            "{:<32} {:>10} {:>12} {:>10} {:>12.1} {:>14} {:>14} {:>14}\n",
            name,
            format!("{:.5}", row.probability),
            priced(row, row.unit_value),
            percent(row.chance_in_batch),
            row.expected_units,
            money(row.cost_to_obtain),
            priced(row, row.pnl_outcome_only),
            priced(row, row.pnl_all_outcomes),
        ));
    }
    if rows.is_empty() {
        out.push_str("(no outcomes)\n");
    }
    out
}

pub fn rate_ladder(context: &ContextKey, engine: &ForecastEngine, rates: &[f64]) -> String {
    let mut out = format!(
        "Context: {context}  base rate {}  step {}  sub-batch {}\n",
        money(engine.base_rate()),
        engine.params().rate_step_decay,
        engine.params().sub_batch_size
    );
    let sub = engine.params().sub_batch_size;
    for (i, rate) in rates.iter().enumerate() {
        let start = i as f64 * sub;
        out.push_str(&format!(
            "  #{i:<4} draws {:>10}..{:<10} rate {}\n",
            start,
            start + sub,
            money(*rate)
        ));
    }
    out
}

pub fn breakdown_table(chunks: &[SubBatchCost]) -> String {
    if chunks.is_empty() {
        return "No cost breakdown (no market data or empty batch).\n".to_string();
    }
    let mut out = format!("{:>6} {:>12} {:>10} {:>14}\n", "Chunk", "Draws", "Rate", "Cost");
    let mut total = 0.0;
    for c in chunks {
        total += c.cost;
        let label = if c.flat_tail {
            format!("{}+", c.index)
        } else {
            c.index.to_string()
        };
        out.push_str(&format!(
            "{:>6} {:>12.1} {:>10} {:>14}\n",
            label,
            c.units,
            money(c.rate),
            money(c.cost)
        ));
    }
    out.push_str(&format!("{:>6} {:>12} {:>10} {:>14}\n", "", "", "total", money(total)));
    out
}

pub fn sweep_table(context: &ContextKey, summaries: &[ForecastSummary]) -> String {
    let mut out = format!("Context: {context}\n");
    out.push_str(&format!(
        "{:>10} {:>14} {:>14} {:>14} {:>12}\n",
        "Batch", "Cost", "Revenue", "Net P&L", "Avg/draw"
    ));
    for s in summaries {
        let fig = |v: f64| if s.has_data { money(v) } else { NO_DATA.to_string() };
        out.push_str(&format!(
            "{:>10} {:>14} {:>14} {:>14} {:>12}\n",
            s.params.selected_batch_size,
            fig(s.total_cost),
            fig(s.total_revenue),
            fig(s.net_pnl),
            fig(s.avg_cost_per_unit)
        ));
    }
    out
}
