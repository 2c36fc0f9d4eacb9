use std::collections::HashMap;

use super::{ProviderError, SnapshotProvider, WeightProvider};
use crate::domain::{ContextKey, Outcome, PricedSnapshot};

/// In-memory provider, for tests and embedding hosts that already hold data.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    weights: HashMap<ContextKey, Vec<Outcome>>,
    snapshots: HashMap<ContextKey, PricedSnapshot>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(mut self, context: ContextKey, outcomes: Vec<Outcome>) -> Self {
        self.weights.insert(context, outcomes);
        self
    }

    pub fn with_snapshot(mut self, context: ContextKey, snapshot: PricedSnapshot) -> Self {
        self.snapshots.insert(context, snapshot);
        self
    }
}

impl WeightProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn weights(&self, context: &ContextKey) -> Result<Vec<Outcome>, ProviderError> {
        self.weights
            .get(context)
            .cloned()
            .ok_or_else(|| ProviderError::ContextNotFound {
                context: context.to_string(),
            })
    }
}

impl SnapshotProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn snapshot(&self, context: &ContextKey) -> Result<Option<PricedSnapshot>, ProviderError> {
        Ok(self.snapshots.get(context).cloned())
    }
}
