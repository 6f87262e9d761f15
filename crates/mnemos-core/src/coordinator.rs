//! Orchestration seam between the volatile and durable memory tiers.

use crate::context::ConversationContext;
use crate::error::EngineError;
use crate::policy::ImportancePolicy;
use log::{debug, info};
use mnemos_config::CoordinatorConfig;
use mnemos_memory::{
    DurableMemoryStore, MemorySource, Message, RetrievedMemory, ScoredDocument,
    VolatileMessageLog, ensure_importance,
};
use std::sync::Arc;

/// Decides tier placement for new messages, merges retrieval results into a
/// single ranked context, and exposes importance scoring and summarization.
pub struct MemoryCoordinator {
    /// Short-term message log.
    volatile: Arc<VolatileMessageLog>,
    /// Long-term memory store.
    durable: Arc<DurableMemoryStore>,
    /// Importance scoring strategy.
    policy: Arc<dyn ImportancePolicy>,
    /// Minimum importance for promotion into durable memory.
    promotion_threshold: f64,
    /// Recent messages pulled into a turn context.
    max_recent: usize,
    /// Durable memories pulled into a turn context.
    max_durable: usize,
}

impl MemoryCoordinator {
    /// Create a coordinator over the two tiers.
    pub fn new(
        volatile: Arc<VolatileMessageLog>,
        durable: Arc<DurableMemoryStore>,
        policy: Arc<dyn ImportancePolicy>,
        config: &CoordinatorConfig,
    ) -> Self {
        Self {
            volatile,
            durable,
            policy,
            promotion_threshold: config.promotion_threshold,
            max_recent: config.max_recent,
            max_durable: config.max_durable,
        }
    }

    /// Record a message in memory.
    ///
    /// The volatile append is unconditional, so short-term memory is always
    /// complete. Promotion to the durable tier happens iff an importance is
    /// supplied and meets the threshold; the threshold is evaluated once, at
    /// write time, and there is no un-promotion path.
    pub async fn record_message(
        &self,
        conversation_id: &str,
        message: &Message,
        importance: Option<f64>,
    ) -> Result<(), EngineError> {
        if let Some(importance) = importance {
            ensure_importance(importance)?;
        }

        self.volatile.append(conversation_id, message).await?;

        if let Some(importance) = importance
            && importance >= self.promotion_threshold
        {
            let entry_id = self
                .durable
                .store_message(conversation_id, message, importance)
                .await?;
            info!(
                "promoted message to durable memory (conversation_id={}, entry_id={}, importance={})",
                conversation_id, entry_id, importance
            );
        }
        Ok(())
    }

    /// Assemble the merged context for a new turn.
    ///
    /// The recency read and the similarity search run concurrently and both
    /// must complete; a failure of either surfaces as `ContextUnavailable`
    /// rather than a silently partial context. Durable hits keep the
    /// similarity engine's relevance and ordering.
    pub async fn build_context(
        &self,
        conversation_id: &str,
        current_input: &str,
    ) -> Result<ConversationContext, EngineError> {
        let (recent, hits) = tokio::join!(
            self.volatile.recent(conversation_id, Some(self.max_recent)),
            self.durable.search(
                current_input,
                Some(conversation_id),
                None,
                None,
                self.max_durable,
            ),
        );
        let recent =
            recent.map_err(|err| EngineError::ContextUnavailable(err.to_string()))?;
        let hits = hits.map_err(|err| EngineError::ContextUnavailable(err.to_string()))?;
        debug!(
            "built context (conversation_id={}, recent={}, durable={})",
            conversation_id,
            recent.len(),
            hits.len()
        );

        let mut context = ConversationContext::new(conversation_id, current_input);
        context.set_retrieved(recent, hits.into_iter().map(retrieved_from_hit).collect());
        Ok(context)
    }

    /// Score the importance of content against the turn context.
    ///
    /// Pure and deterministic: identical inputs always yield the identical
    /// score within a turn.
    pub fn score_importance(&self, content: &str, context: &ConversationContext) -> f64 {
        self.policy.score(content, context)
    }

    /// Render the context into the deterministic prompt text handed to the
    /// generator. Sections whose source sequence is empty are omitted
    /// entirely; the rendering always ends with the raw current input.
    pub fn compose_prompt_context(&self, context: &ConversationContext) -> String {
        let mut parts = Vec::new();

        if !context.relevant_memories.is_empty() {
            parts.push("Relevant information from memory:".to_string());
            for (i, memory) in context.relevant_memories.iter().enumerate() {
                parts.push(format!("{}. {}", i + 1, memory.content));
            }
            parts.push(String::new());
        }

        if !context.recent_messages.is_empty() {
            parts.push("Conversation history:".to_string());
            for message in &context.recent_messages {
                parts.push(format!("{}: {}", message.role.label(), message.content));
            }
            parts.push(String::new());
        }

        parts.push(format!("Current user input: {}", context.current_input));
        parts.join("\n")
    }

    /// Search durable memories relevant to a query.
    pub async fn search_memories(
        &self,
        query: &str,
        conversation_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RetrievedMemory>, EngineError> {
        let hits = self
            .durable
            .search(query, conversation_id, None, None, limit)
            .await?;
        Ok(hits.into_iter().map(retrieved_from_hit).collect())
    }

    /// Summarize a conversation's durable message entries, returning the new
    /// summary entry's id, or `None` when there is nothing to summarize.
    pub async fn summarize(&self, conversation_id: &str) -> Result<Option<String>, EngineError> {
        Ok(self.durable.summarize(conversation_id).await?)
    }
}

/// Wrap a similarity hit as a durable-sourced retrieved memory.
fn retrieved_from_hit(hit: ScoredDocument) -> RetrievedMemory {
    RetrievedMemory {
        content: hit.content,
        source: MemorySource::Durable,
        relevance: hit.relevance,
        metadata: hit.metadata,
    }
}
