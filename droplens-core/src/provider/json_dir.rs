//! File-backed provider: one directory per context.
//!
//! ```text
//! <root>/<context>/weights.json   [{"id": "...", "weight": 1.0, "tagged": false}, ...]
//! <root>/<context>/snapshot.json  {"fetched_at": ..., "value_ratio": ..., "unit_acquisition_cost": ..., "prices": {...}}
//! ```

use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ProviderError, SnapshotProvider, WeightProvider};
use crate::domain::{ContextKey, Outcome, PricedSnapshot};

pub const WEIGHTS_FILE: &str = "weights.json";
pub const SNAPSHOT_FILE: &str = "snapshot.json";

#[derive(Debug, Clone)]
pub struct JsonDirProvider {
    root: PathBuf,
}

impl JsonDirProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn context_dir(&self, context: &ContextKey) -> PathBuf {
        self.root.join(context.as_str())
    }

    /// Context directories that contain a weights file, sorted by name.
    pub fn contexts(&self) -> Result<Vec<ContextKey>, ProviderError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| ProviderError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut contexts: Vec<ContextKey> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().join(WEIGHTS_FILE).is_file())
            .filter_map(|e| e.file_name().to_str().map(ContextKey::new))
            .collect();
        contexts.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(contexts)
    }

    /// Write a snapshot for `context`, creating the directory if needed.
    pub fn store_snapshot(
        &self,
        context: &ContextKey,
        snapshot: &PricedSnapshot,
    ) -> Result<PathBuf, ProviderError> {
        self.store(context, SNAPSHOT_FILE, snapshot)
    }

    /// Write weights for `context`, creating the directory if needed.
    pub fn store_weights(&self, context: &ContextKey, outcomes: &[Outcome]) -> Result<PathBuf, ProviderError> {
        self.store(context, WEIGHTS_FILE, &outcomes)
    }

    fn store<T: serde::Serialize + ?Sized>(
        &self,
        context: &ContextKey,
        file: &str,
        value: &T,
    ) -> Result<PathBuf, ProviderError> {
        let dir = self.context_dir(context);
        let path = dir.join(file);
        let io_err = |source| ProviderError::Io {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(&dir).map_err(io_err)?;
        let json = serde_json::to_string_pretty(value).map_err(|source| ProviderError::Encode {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, json).map_err(io_err)?;
        Ok(path)
    }

    /// Read and parse `path`; `Ok(None)` when the file does not exist.
    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ProviderError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ProviderError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ProviderError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl WeightProvider for JsonDirProvider {
    fn name(&self) -> &str {
        "json-dir"
    }

    fn weights(&self, context: &ContextKey) -> Result<Vec<Outcome>, ProviderError> {
        let path = self.context_dir(context).join(WEIGHTS_FILE);
        tracing::debug!(path = %path.display(), "reading weights");
        Self::read_json(&path)?.ok_or_else(|| ProviderError::ContextNotFound {
            context: context.to_string(),
        })
    }
}

impl SnapshotProvider for JsonDirProvider {
    fn name(&self) -> &str {
        "json-dir"
    }

    fn snapshot(&self, context: &ContextKey) -> Result<Option<PricedSnapshot>, ProviderError> {
        let path = self.context_dir(context).join(SNAPSHOT_FILE);
        tracing::debug!(path = %path.display(), "reading snapshot");
        let snapshot = Self::read_json(&path)?;
        if snapshot.is_none() {
            tracing::info!(%context, "no snapshot on disk");
        }
        Ok(snapshot)
    }
}
