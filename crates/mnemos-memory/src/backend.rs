//! Backend traits for the external stores, plus in-memory defaults.
//!
//! The engine consumes three narrow capabilities: a key-ordered list store
//! for the volatile tier, a structured document store for the durable tier,
//! and an opaque similarity index for semantic search. Production deployments
//! implement these traits over their own infrastructure; the in-memory
//! implementations here are the bundled defaults and the test substrate.

use crate::error::MemoryError;
use crate::model::{MemoryEntry, MemoryKind, ScoredDocument};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Key-ordered volatile store: head-insert lists with trim and expiry.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Insert a value at the head of the list under `key`.
    async fn push_head(&self, key: &str, value: &str) -> Result<(), MemoryError>;
    /// Truncate the list to at most `max_len` items, discarding the oldest.
    async fn trim(&self, key: &str, max_len: usize) -> Result<(), MemoryError>;
    /// (Re)set the inactivity expiry on the whole key.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), MemoryError>;
    /// Read up to `limit` values from the head (newest first).
    async fn range(&self, key: &str, limit: usize) -> Result<Vec<String>, MemoryError>;
    /// Delete the key; absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), MemoryError>;
}

/// Structured query for durable entries.
#[derive(Debug, Clone)]
pub struct EntryQuery {
    /// Conversation to query.
    pub conversation_id: String,
    /// Optional kind filter.
    pub kind: Option<MemoryKind>,
    /// Optional minimum importance filter.
    pub min_importance: Option<f64>,
    /// Maximum number of entries to return.
    pub limit: usize,
}

/// Durable document store: insert and structured lookup of memory entries.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new entry.
    async fn insert(&self, entry: MemoryEntry) -> Result<(), MemoryError>;
    /// Fetch a single entry by id.
    async fn find_one(&self, id: &str) -> Result<Option<MemoryEntry>, MemoryError>;
    /// Fetch entries matching the query, ordered by descending created_at.
    async fn find_many(&self, query: &EntryQuery) -> Result<Vec<MemoryEntry>, MemoryError>;
}

/// Metadata constraints for a similarity search.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Restrict matches to one conversation.
    pub conversation_id: Option<String>,
    /// Restrict matches to one kind.
    pub kind: Option<MemoryKind>,
    /// Require at least this importance.
    pub min_importance: Option<f64>,
}

impl SearchFilter {
    /// Check an index metadata document against the filter.
    pub fn matches(&self, metadata: &serde_json::Value) -> bool {
        if let Some(conversation_id) = &self.conversation_id {
            if metadata.get("conversation_id").and_then(|v| v.as_str())
                != Some(conversation_id.as_str())
            {
                return false;
            }
        }
        if let Some(kind) = &self.kind {
            if metadata.get("kind").and_then(|v| v.as_str()) != Some(kind.as_str()) {
                return false;
            }
        }
        if let Some(min_importance) = self.min_importance {
            let importance = metadata
                .get("importance")
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            if importance < min_importance {
                return false;
            }
        }
        true
    }
}

/// Opaque similarity engine: indexes text and returns ranked matches.
/// The engine's ordering is authoritative; callers do not re-rank.
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Index a text with metadata, returning the index record id.
    async fn upsert(&self, text: &str, metadata: serde_json::Value)
    -> Result<String, MemoryError>;
    /// Return up to `k` ranked matches for the query. Engines that cannot
    /// apply the filter server-side may return unfiltered results; callers
    /// post-filter.
    async fn search(
        &self,
        query: &str,
        k: usize,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<ScoredDocument>, MemoryError>;
}

/// Per-conversation list with an optional inactivity deadline.
#[derive(Debug, Default)]
struct ListEntry {
    items: VecDeque<String>,
    expires_at: Option<Instant>,
}

/// In-memory list store with head-insert, trim, and TTL semantics.
#[derive(Debug, Default)]
pub struct InMemoryListStore {
    lists: Mutex<HashMap<String, ListEntry>>,
}

impl InMemoryListStore {
    /// Create an empty list store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the key if its deadline has passed.
    fn purge_expired(lists: &mut HashMap<String, ListEntry>, key: &str) {
        let expired = lists
            .get(key)
            .and_then(|entry| entry.expires_at)
            .map(|deadline| deadline <= Instant::now())
            .unwrap_or(false);
        if expired {
            lists.remove(key);
        }
    }
}

#[async_trait]
impl ListStore for InMemoryListStore {
    async fn push_head(&self, key: &str, value: &str) -> Result<(), MemoryError> {
        let mut lists = self.lists.lock();
        Self::purge_expired(&mut lists, key);
        lists
            .entry(key.to_string())
            .or_default()
            .items
            .push_front(value.to_string());
        Ok(())
    }

    async fn trim(&self, key: &str, max_len: usize) -> Result<(), MemoryError> {
        let mut lists = self.lists.lock();
        if let Some(entry) = lists.get_mut(key) {
            entry.items.truncate(max_len);
        }
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), MemoryError> {
        let mut lists = self.lists.lock();
        if let Some(entry) = lists.get_mut(key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn range(&self, key: &str, limit: usize) -> Result<Vec<String>, MemoryError> {
        let mut lists = self.lists.lock();
        Self::purge_expired(&mut lists, key);
        let values = lists
            .get(key)
            .map(|entry| entry.items.iter().take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(values)
    }

    async fn remove(&self, key: &str) -> Result<(), MemoryError> {
        self.lists.lock().remove(key);
        Ok(())
    }
}

/// In-memory document store over a flat entry list.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    entries: Mutex<Vec<MemoryEntry>>,
}

impl InMemoryDocumentStore {
    /// Create an empty document store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, entry: MemoryEntry) -> Result<(), MemoryError> {
        self.entries.lock().push(entry);
        Ok(())
    }

    async fn find_one(&self, id: &str) -> Result<Option<MemoryEntry>, MemoryError> {
        Ok(self
            .entries
            .lock()
            .iter()
            .find(|entry| entry.id == id)
            .cloned())
    }

    async fn find_many(&self, query: &EntryQuery) -> Result<Vec<MemoryEntry>, MemoryError> {
        // Reverse insertion order first so the stable sort keeps the most
        // recently inserted entry ahead on created_at ties.
        let mut matches: Vec<MemoryEntry> = self
            .entries
            .lock()
            .iter()
            .rev()
            .filter(|entry| entry.conversation_id == query.conversation_id)
            .filter(|entry| query.kind.as_ref().is_none_or(|kind| &entry.kind == kind))
            .filter(|entry| {
                query
                    .min_importance
                    .is_none_or(|min| entry.importance >= min)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matches.truncate(query.limit);
        Ok(matches)
    }
}

/// Indexed text with its metadata.
#[derive(Debug, Clone)]
struct IndexedDocument {
    content: String,
    metadata: serde_json::Value,
}

/// Deterministic lexical similarity index.
///
/// Ranks by the fraction of distinct query tokens found in a document. Not a
/// real embedding engine; it exists so the engine is usable and testable
/// without external infrastructure.
#[derive(Debug, Default)]
pub struct LexicalIndex {
    documents: Mutex<Vec<IndexedDocument>>,
}

impl LexicalIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    fn tokenize(text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl SimilarityIndex for LexicalIndex {
    async fn upsert(
        &self,
        text: &str,
        metadata: serde_json::Value,
    ) -> Result<String, MemoryError> {
        let id = Uuid::new_v4().to_string();
        self.documents.lock().push(IndexedDocument {
            content: text.to_string(),
            metadata,
        });
        Ok(id)
    }

    async fn search(
        &self,
        query: &str,
        k: usize,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<ScoredDocument>, MemoryError> {
        let query_tokens = Self::tokenize(query);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut ranked: Vec<ScoredDocument> = self
            .documents
            .lock()
            .iter()
            .filter(|doc| filter.is_none_or(|f| f.matches(&doc.metadata)))
            .filter_map(|doc| {
                let doc_tokens = Self::tokenize(&doc.content);
                let overlap = query_tokens.intersection(&doc_tokens).count();
                if overlap == 0 {
                    return None;
                }
                Some(ScoredDocument {
                    content: doc.content.clone(),
                    metadata: doc.metadata.clone(),
                    relevance: overlap as f64 / query_tokens.len() as f64,
                })
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(k);
        Ok(ranked)
    }
}
