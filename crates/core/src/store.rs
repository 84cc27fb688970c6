use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Opaque identifier of the location a run's status block lives at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid run id {0:?}")]
    InvalidRunId(String),
    #[error("storage backend: {0}")]
    Backend(String),
}

/// Raw read/write access to stored status blocks.
///
/// There is no locking: two writers that read the same block both win in
/// turn, and the last write is kept.
pub trait RunStore {
    fn read_raw(&self, run: &RunId) -> Result<Option<String>, StoreError>;
    fn write_raw(&mut self, run: &RunId, raw: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<RunId, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove(&mut self, run: &RunId) -> Option<String> {
        self.records.remove(run)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RunStore for MemoryStore {
    fn read_raw(&self, run: &RunId) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(run).cloned())
    }

    fn write_raw(&mut self, run: &RunId, raw: &str) -> Result<(), StoreError> {
        self.records.insert(run.clone(), raw.to_string());
        Ok(())
    }
}
