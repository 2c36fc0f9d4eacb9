//! DropLens Core: drop outcome forecasting engine.
//!
//! Turns a weighted distribution over drop outcomes, a market price per
//! outcome and a sliding exchange-rate model into per-outcome acquisition
//! costs and batch-level profitability:
//! - Domain types (outcomes, prices, snapshots, forecast rows)
//! - Rate model: per-sub-batch rates and bulk purchase cost
//! - Outcome set: probabilities and expected-value contributions
//! - Forecast engine: explicit load / set / recompute cycle and aggregates
//! - Providers for weights and snapshots, config and report export

pub mod config;
pub mod domain;
pub mod forecast;
pub mod outcome_set;
pub mod params;
pub mod provider;
pub mod rate_model;
pub mod report;

pub use config::{ConfigError, DropLensConfig, SourceConfig};
pub use domain::{
    ConfidenceTier, ContextKey, ForecastRow, MarketSnapshot, Outcome, OutcomeId, PriceInfo,
    PriceSource, PriceTable, PricedSnapshot,
};
pub use forecast::{ForecastEngine, ForecastSummary};
pub use outcome_set::SortKey;
pub use params::{ForecastParams, ParamOverrides};
pub use provider::{ProviderError, SnapshotProvider, WeightProvider};
pub use rate_model::RATE_FLOOR;
