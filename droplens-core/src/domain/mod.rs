//! Domain types for DropLens

pub mod ids;
pub mod outcome;
pub mod price;
pub mod row;
pub mod snapshot;

pub use ids::{ContextKey, OutcomeId};
pub use outcome::Outcome;
pub use price::{ConfidenceTier, PriceInfo, PriceSource, PriceTable};
pub use row::ForecastRow;
pub use snapshot::{MarketSnapshot, PricedSnapshot};
