//! Durable long-term memory store.

use crate::backend::{DocumentStore, EntryQuery, SearchFilter, SimilarityIndex};
use crate::error::MemoryError;
use crate::event::{MemoryEvent, MemoryEventKind, MemoryEventSink};
use crate::model::{
    MemoryEntry, MemoryKind, Message, ScoredDocument, ensure_conversation_id, ensure_importance,
};
use crate::policy::Summarizer;
use chrono::Utc;
use log::{debug, info, warn};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Tier tag carried in event payloads from this store.
const LONG_TERM: &str = "long_term";

/// Conversation id used for search events without a conversation filter.
const GLOBAL_CONVERSATION: &str = "global";

/// Persisted, queryable, semantically-searchable memory entries with
/// importance and kind metadata.
pub struct DurableMemoryStore {
    /// Structured document backend.
    documents: Arc<dyn DocumentStore>,
    /// Similarity index backend.
    index: Arc<dyn SimilarityIndex>,
    /// Sink for lifecycle events.
    events: Arc<dyn MemoryEventSink>,
    /// Summary synthesis strategy.
    summarizer: Arc<dyn Summarizer>,
    /// How many recent message entries a summary draws from.
    summary_window: usize,
}

impl DurableMemoryStore {
    /// Create a new store over the given backends.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        index: Arc<dyn SimilarityIndex>,
        events: Arc<dyn MemoryEventSink>,
        summarizer: Arc<dyn Summarizer>,
        summary_window: usize,
    ) -> Self {
        Self {
            documents,
            index,
            events,
            summarizer,
            summary_window,
        }
    }

    /// Persist a new memory entry and index its content for similarity
    /// search. Returns the store-assigned entry id.
    ///
    /// The document write and the index write are independent: an index
    /// failure after a successful persist leaves the entry unsearchable
    /// until re-indexed, and is logged rather than failing the call. The
    /// `created` event fires on persistence success regardless of index
    /// outcome.
    pub async fn store(
        &self,
        conversation_id: &str,
        content: &str,
        kind: MemoryKind,
        metadata: serde_json::Value,
        importance: f64,
    ) -> Result<String, MemoryError> {
        ensure_conversation_id(conversation_id)?;
        ensure_importance(importance)?;

        let entry = MemoryEntry {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            content: content.to_string(),
            kind: kind.clone(),
            importance,
            metadata: metadata.clone(),
            created_at: Utc::now(),
        };
        let entry_id = entry.id.clone();
        self.documents.insert(entry).await?;

        let index_metadata = index_metadata(&entry_id, conversation_id, &kind, importance, metadata);
        if let Err(err) = self.index.upsert(content, index_metadata).await {
            warn!(
                "index write failed, entry persisted but not searchable (entry_id={}, conversation_id={}): {}",
                entry_id, conversation_id, err
            );
        }

        info!(
            "stored durable memory (entry_id={}, conversation_id={}, kind={}, importance={})",
            entry_id,
            conversation_id,
            kind.as_str(),
            importance
        );
        self.events.emit(MemoryEvent::now(
            MemoryEventKind::Created,
            conversation_id,
            json!({
                "tier": LONG_TERM,
                "memory_id": entry_id,
                "content": content,
            }),
        ));
        Ok(entry_id)
    }

    /// Persist a conversation message as a message-kind entry, tagging the
    /// sender role in metadata.
    pub async fn store_message(
        &self,
        conversation_id: &str,
        message: &Message,
        importance: f64,
    ) -> Result<String, MemoryError> {
        self.store(
            conversation_id,
            &message.content,
            MemoryKind::Message,
            json!({ "sender": message.role.as_str() }),
            importance,
        )
        .await
    }

    /// Search memories semantically related to the query.
    ///
    /// Ranking is delegated to the similarity index; results the engine did
    /// not filter server-side are post-filtered here. No matches is an empty
    /// sequence, never an error.
    pub async fn search(
        &self,
        query: &str,
        conversation_id: Option<&str>,
        kind: Option<MemoryKind>,
        min_importance: Option<f64>,
        limit: usize,
    ) -> Result<Vec<ScoredDocument>, MemoryError> {
        let filter = SearchFilter {
            conversation_id: conversation_id.map(str::to_string),
            kind,
            min_importance,
        };
        let mut hits = self.index.search(query, limit, Some(&filter)).await?;
        hits.retain(|doc| filter.matches(&doc.metadata));
        debug!(
            "searched durable memory (query_len={}, conversation_id={:?}, hits={})",
            query.len(),
            conversation_id,
            hits.len()
        );

        self.events.emit(MemoryEvent::now(
            MemoryEventKind::Retrieved,
            conversation_id.unwrap_or(GLOBAL_CONVERSATION),
            json!({
                "tier": LONG_TERM,
                "query": query,
                "result_count": hits.len(),
            }),
        ));
        Ok(hits)
    }

    /// Fetch entries for a conversation ordered by descending created_at.
    pub async fn conversation_entries(
        &self,
        conversation_id: &str,
        kind: Option<MemoryKind>,
        min_importance: Option<f64>,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>, MemoryError> {
        ensure_conversation_id(conversation_id)?;
        self.documents
            .find_many(&EntryQuery {
                conversation_id: conversation_id.to_string(),
                kind,
                min_importance,
                limit,
            })
            .await
    }

    /// Fetch a single entry by id.
    pub async fn entry(&self, id: &str) -> Result<Option<MemoryEntry>, MemoryError> {
        self.documents.find_one(id).await
    }

    /// Synthesize and store a summary of the conversation's recent
    /// message-kind entries.
    ///
    /// Returns `None` without writing anything when the conversation has no
    /// stored messages; otherwise returns the new summary entry's id. The
    /// summary is stored with importance 1.0.
    pub async fn summarize(&self, conversation_id: &str) -> Result<Option<String>, MemoryError> {
        let messages = self
            .conversation_entries(
                conversation_id,
                Some(MemoryKind::Message),
                None,
                self.summary_window,
            )
            .await?;
        if messages.is_empty() {
            debug!(
                "skipping summary for conversation without messages (conversation_id={})",
                conversation_id
            );
            return Ok(None);
        }

        let summary = self.summarizer.summarize(&messages);
        let summary_id = self
            .store(conversation_id, &summary, MemoryKind::Summary, json!({}), 1.0)
            .await?;
        Ok(Some(summary_id))
    }
}

/// Build the metadata document an entry is indexed with: user metadata plus
/// the reserved tags searches filter on.
fn index_metadata(
    entry_id: &str,
    conversation_id: &str,
    kind: &MemoryKind,
    importance: f64,
    metadata: serde_json::Value,
) -> serde_json::Value {
    let mut map = match metadata {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    map.insert("memory_id".to_string(), json!(entry_id));
    map.insert("conversation_id".to_string(), json!(conversation_id));
    map.insert("kind".to_string(), json!(kind.as_str()));
    map.insert("importance".to_string(), json!(importance));
    serde_json::Value::Object(map)
}
