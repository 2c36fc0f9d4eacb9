//! Export forecast rows and summaries as CSV / JSON.

use thiserror::Error;

use crate::domain::ForecastRow;
use crate::forecast::ForecastSummary;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV writer flush failed: {0}")]
    Flush(String),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rows as CSV, one line per outcome in the given order.
///
/// Unpriced rows leave `unit_value` and both P&L columns empty, so "no data"
/// stays distinguishable from 0 downstream.
pub fn export_rows_csv<'a, I>(rows: I) -> Result<String, ReportError>
where
    I: IntoIterator<Item = &'a ForecastRow>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "id",
        "tagged",
        "weight",
        "probability",
        "has_price",
        "unit_value",
        "ev_contribution",
        "chance_in_batch",
        "expected_units",
        "cost_to_obtain",
        "pnl_outcome_only",
        "pnl_all_outcomes",
    ])?;

    for row in rows {
        let priced = |v: f64| {
            if row.has_price {
                format!("{v:.4}")
            } else {
                String::new()
            }
        };
        wtr.write_record([
            row.id.to_string(),
            row.tagged.to_string(),
            format!("{}", row.weight),
            format!("{:.8}", row.probability),
            row.has_price.to_string(),
            priced(row.unit_value),
            format!("{:.6}", row.ev_contribution),
            format!("{:.6}", row.chance_in_batch),
            format!("{:.4}", row.expected_units),
            format!("{:.4}", row.cost_to_obtain),
            priced(row.pnl_outcome_only),
            priced(row.pnl_all_outcomes),
        ])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ReportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

pub fn export_summary_json(summary: &ForecastSummary) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Summary and rows together as one JSON document.
pub fn export_forecast_json(summary: &ForecastSummary, rows: &[&ForecastRow]) -> Result<String, ReportError> {
    let doc = serde_json::json!({
        "summary": summary,
        "rows": rows,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}
