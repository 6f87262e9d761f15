//! Turn API façade.

use crate::coordinator::MemoryCoordinator;
use crate::error::EngineError;
use crate::generate::ResponseGenerator;
use crate::policy::LengthHeuristic;
use crate::workflow::TurnWorkflow;
use log::info;
use mnemos_config::MnemosConfig;
use mnemos_memory::{
    CountSummarizer, DurableMemoryStore, InMemoryDocumentStore, InMemoryListStore, LexicalIndex,
    MemoryEventSink, RetrievedMemory, VolatileMessageLog,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Result of a processed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Conversation the turn was recorded under. Newly minted when the
    /// caller did not supply one.
    pub conversation_id: String,
    /// Generated response text.
    pub response: String,
    /// Durable memories that informed the response.
    pub relevant_memories: Vec<RetrievedMemory>,
    /// Importance score assigned to the turn.
    pub importance_score: f64,
}

/// Entry point consumed by transports: one instance per process, shared
/// across conversations.
pub struct MemoryEngine {
    coordinator: Arc<MemoryCoordinator>,
    workflow: TurnWorkflow,
    search_limit: usize,
}

impl MemoryEngine {
    /// Create an engine over an existing coordinator.
    pub fn new(
        coordinator: Arc<MemoryCoordinator>,
        generator: Arc<dyn ResponseGenerator>,
        search_limit: usize,
    ) -> Self {
        let workflow = TurnWorkflow::new(coordinator.clone(), generator);
        Self {
            coordinator,
            workflow,
            search_limit,
        }
    }

    /// Wire an engine with in-process backends from configuration.
    pub fn in_memory(
        config: &MnemosConfig,
        generator: Arc<dyn ResponseGenerator>,
        events: Arc<dyn MemoryEventSink>,
    ) -> Self {
        let volatile = Arc::new(VolatileMessageLog::new(
            Arc::new(InMemoryListStore::new()),
            events.clone(),
            config.volatile.max_messages,
            Duration::from_secs(config.volatile.ttl_secs),
        ));
        let durable = Arc::new(DurableMemoryStore::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(LexicalIndex::new()),
            events,
            Arc::new(CountSummarizer),
            config.durable.summary_window,
        ));
        let coordinator = Arc::new(MemoryCoordinator::new(
            volatile,
            durable,
            Arc::new(LengthHeuristic),
            &config.coordinator,
        ));
        Self::new(coordinator, generator, config.durable.search_limit)
    }

    /// Process one conversational turn.
    ///
    /// A missing conversation id starts a new conversation under a freshly
    /// minted id, returned in the outcome so the caller can continue it.
    pub async fn process_turn(
        &self,
        conversation_id: Option<&str>,
        input: &str,
    ) -> Result<TurnOutcome, EngineError> {
        let conversation_id = match conversation_id {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                info!("started new conversation (conversation_id={})", id);
                id
            }
        };

        let context = self.workflow.run(&conversation_id, input).await?;
        Ok(TurnOutcome {
            conversation_id,
            response: context.response.unwrap_or_default(),
            relevant_memories: context.relevant_memories,
            importance_score: context.importance_score.unwrap_or_default(),
        })
    }

    /// Search durable memories. Unscoped queries search across all
    /// conversations.
    pub async fn search_memories(
        &self,
        query: &str,
        conversation_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<RetrievedMemory>, EngineError> {
        self.coordinator
            .search_memories(query, conversation_id, limit.unwrap_or(self.search_limit))
            .await
    }

    /// Summarize a conversation's durable message entries. The summary is
    /// stored as a maximum-importance durable entry and its id is returned;
    /// a conversation with no stored messages yields `None`.
    pub async fn summarize(&self, conversation_id: &str) -> Result<Option<String>, EngineError> {
        self.coordinator.summarize(conversation_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryEngine;
    use crate::error::EngineError;
    use crate::generate::ResponseGenerator;
    use async_trait::async_trait;
    use mnemos_config::MnemosConfig;
    use mnemos_memory::NoopEventSink;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    struct StaticGenerator(&'static str);

    #[async_trait]
    impl ResponseGenerator for StaticGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, EngineError> {
            Ok(self.0.to_string())
        }
    }

    fn engine() -> MemoryEngine {
        MemoryEngine::in_memory(
            &MnemosConfig::default(),
            Arc::new(StaticGenerator("noted.")),
            Arc::new(NoopEventSink),
        )
    }

    #[tokio::test]
    async fn process_turn_mints_conversation_id_when_absent() {
        let engine = engine();
        let outcome = engine.process_turn(None, "Hello").await.expect("turn");
        assert!(!outcome.conversation_id.is_empty());
        assert_eq!(outcome.response, "noted.");
    }

    #[tokio::test]
    async fn process_turn_reuses_supplied_conversation_id() {
        let engine = engine();
        let outcome = engine
            .process_turn(Some("conv-7"), "Hello")
            .await
            .expect("turn");
        assert_eq!(outcome.conversation_id, "conv-7");
    }

    #[tokio::test]
    async fn search_defaults_to_configured_limit() {
        let engine = MemoryEngine::in_memory(
            &MnemosConfig::default(),
            Arc::new(StaticGenerator("I will keep the shared keyword anchor.")),
            Arc::new(NoopEventSink),
        );
        // Inputs long enough to score past the promotion threshold, so each
        // turn leaves one durable assistant entry behind.
        for i in 0..10 {
            engine
                .process_turn(
                    Some("conv"),
                    &format!(
                        "please remember the shared keyword anchor, repetition {i}, \
                         it matters for everything we discuss later"
                    ),
                )
                .await
                .expect("turn");
        }

        let hits = engine
            .search_memories("shared keyword anchor", Some("conv"), None)
            .await
            .expect("search");
        assert_eq!(hits.len(), 5);
    }
}
