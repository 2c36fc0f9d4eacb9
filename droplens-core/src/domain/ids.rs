use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one possible drop outcome (e.g. an item or card name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeId(pub String);

impl OutcomeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutcomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OutcomeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Game/league context that weights and snapshots are scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextKey(pub String);

impl ContextKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_id_serializes_as_plain_string() {
        let id = OutcomeId::new("The Doctor");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"The Doctor\"");
        assert_eq!(id.to_string(), "The Doctor");
    }

    #[test]
    fn context_key_display() {
        assert_eq!(ContextKey::new("standard").to_string(), "standard");
    }
}
