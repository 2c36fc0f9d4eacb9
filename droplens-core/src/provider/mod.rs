//! Input providers and structured error types.
//!
//! The engine never fetches anything itself. Hosts pull weights and a
//! snapshot for a context through these traits and hand them to
//! `ForecastEngine::load`. Implementations can be swapped for tests.

pub mod json_dir;
pub mod memory;

pub use json_dir::JsonDirProvider;
pub use memory::StaticProvider;

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{ContextKey, Outcome, PricedSnapshot};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no weights for context '{context}'")]
    ContextNotFound { context: String },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of outcome weights for a context.
pub trait WeightProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn weights(&self, context: &ContextKey) -> Result<Vec<Outcome>, ProviderError>;
}

/// Source of the market snapshot for a context.
///
/// `Ok(None)` means no market data exists yet, which is not an error.
pub trait SnapshotProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn snapshot(&self, context: &ContextKey) -> Result<Option<PricedSnapshot>, ProviderError>;
}

/// Weights and snapshot fetched together for one context.
#[derive(Debug, Clone)]
pub struct ForecastInputs {
    pub context: ContextKey,
    pub outcomes: Vec<Outcome>,
    pub snapshot: Option<PricedSnapshot>,
}

/// Fetch both inputs for `context`.
pub fn fetch_inputs<W, S>(
    weights: &W,
    snapshots: &S,
    context: &ContextKey,
) -> Result<ForecastInputs, ProviderError>
where
    W: WeightProvider + ?Sized,
    S: SnapshotProvider + ?Sized,
{
    let outcomes = weights.weights(context)?;
    let snapshot = snapshots.snapshot(context)?;
    tracing::debug!(
        %context,
        weight_provider = weights.name(),
        snapshot_provider = snapshots.name(),
        outcomes = outcomes.len(),
        has_snapshot = snapshot.is_some(),
        "fetched forecast inputs"
    );
    Ok(ForecastInputs {
        context: context.clone(),
        outcomes,
        snapshot,
    })
}
