use async_trait::async_trait;
use mnemos_memory::{ListStore, MemoryError, ScoredDocument, SearchFilter, SimilarityIndex};
use std::time::Duration;

/// List store whose every operation fails with `StoreUnavailable`.
#[derive(Debug, Clone)]
pub struct FailingListStore {
    message: String,
}

impl FailingListStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn unavailable(&self) -> MemoryError {
        MemoryError::StoreUnavailable(self.message.clone())
    }
}

#[async_trait]
impl ListStore for FailingListStore {
    async fn push_head(&self, _key: &str, _value: &str) -> Result<(), MemoryError> {
        Err(self.unavailable())
    }

    async fn trim(&self, _key: &str, _max_len: usize) -> Result<(), MemoryError> {
        Err(self.unavailable())
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> Result<(), MemoryError> {
        Err(self.unavailable())
    }

    async fn range(&self, _key: &str, _limit: usize) -> Result<Vec<String>, MemoryError> {
        Err(self.unavailable())
    }

    async fn remove(&self, _key: &str) -> Result<(), MemoryError> {
        Err(self.unavailable())
    }
}

/// Similarity index whose every operation fails with an index error.
#[derive(Debug, Clone)]
pub struct FailingIndex {
    message: String,
}

impl FailingIndex {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl SimilarityIndex for FailingIndex {
    async fn upsert(
        &self,
        _text: &str,
        _metadata: serde_json::Value,
    ) -> Result<String, MemoryError> {
        Err(MemoryError::Index(self.message.clone()))
    }

    async fn search(
        &self,
        _query: &str,
        _k: usize,
        _filter: Option<&SearchFilter>,
    ) -> Result<Vec<ScoredDocument>, MemoryError> {
        Err(MemoryError::Index(self.message.clone()))
    }
}
