//! Three-stage turn workflow.

use crate::context::ConversationContext;
use crate::coordinator::MemoryCoordinator;
use crate::error::EngineError;
use crate::generate::ResponseGenerator;
use log::{debug, info};
use mnemos_memory::Message;
use std::fmt;
use std::sync::Arc;

/// Stages of the turn workflow, in execution order.
///
/// The progression is strictly linear with no branches, retries, or skips;
/// a stage failure tags the turn error with the stage it occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    /// Build the merged memory context for the input.
    RetrieveContext,
    /// Compose the prompt and call the generator.
    GenerateResponse,
    /// Record the turn's messages in memory.
    PersistTurn,
}

impl TurnStage {
    /// Stable name used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnStage::RetrieveContext => "retrieve_context",
            TurnStage::GenerateResponse => "generate_response",
            TurnStage::PersistTurn => "persist_turn",
        }
    }
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives one conversational turn through its three stages.
///
/// Retrieval and generation are read-only with respect to memory; only the
/// persist stage writes. A failure before persistence therefore leaves
/// memory untouched, and a persist failure leaves memory partially updated
/// in a way the error makes visible to the caller.
pub struct TurnWorkflow {
    coordinator: Arc<MemoryCoordinator>,
    generator: Arc<dyn ResponseGenerator>,
}

impl TurnWorkflow {
    /// Create a workflow over a coordinator and a generator.
    pub fn new(coordinator: Arc<MemoryCoordinator>, generator: Arc<dyn ResponseGenerator>) -> Self {
        Self {
            coordinator,
            generator,
        }
    }

    /// Run a full turn for the given user input.
    pub async fn run(
        &self,
        conversation_id: &str,
        input: &str,
    ) -> Result<ConversationContext, EngineError> {
        let mut context = self
            .retrieve_context(conversation_id, input)
            .await
            .map_err(|err| EngineError::at_stage(TurnStage::RetrieveContext, err))?;

        let response = self
            .generate_response(&mut context)
            .await
            .map_err(|err| EngineError::at_stage(TurnStage::GenerateResponse, err))?;

        self.persist_turn(&mut context, &response)
            .await
            .map_err(|err| EngineError::at_stage(TurnStage::PersistTurn, err))?;

        info!(
            "turn completed (conversation_id={}, importance={:?})",
            conversation_id, context.importance_score
        );
        Ok(context)
    }

    /// Stage 1: build the merged memory context.
    async fn retrieve_context(
        &self,
        conversation_id: &str,
        input: &str,
    ) -> Result<ConversationContext, EngineError> {
        let context = self.coordinator.build_context(conversation_id, input).await?;
        debug!(
            "retrieved context (conversation_id={}, recent={}, memories={})",
            conversation_id,
            context.recent_messages.len(),
            context.relevant_memories.len()
        );
        Ok(context)
    }

    /// Stage 2: compose the prompt and call the generator. Returns the
    /// response text so the persist stage receives it directly.
    async fn generate_response(
        &self,
        context: &mut ConversationContext,
    ) -> Result<String, EngineError> {
        let prompt = self.coordinator.compose_prompt_context(context);
        let response = self.generator.generate(&prompt).await?;
        context.set_response(response.clone());
        Ok(response)
    }

    /// Stage 3: record the turn in memory.
    ///
    /// The importance score is computed from the user's input against the
    /// pre-response context. The user message is recorded without an
    /// importance, so it stays in the volatile tier; the assistant message
    /// carries the score and is promotion-eligible.
    async fn persist_turn(
        &self,
        context: &mut ConversationContext,
        response: &str,
    ) -> Result<(), EngineError> {
        let score = self
            .coordinator
            .score_importance(&context.current_input, context);

        let user_message = Message::user(context.current_input.clone());
        self.coordinator
            .record_message(&context.conversation_id, &user_message, None)
            .await?;

        let assistant_message = Message::assistant(response);
        self.coordinator
            .record_message(&context.conversation_id, &assistant_message, Some(score))
            .await?;

        context.set_importance(score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{TurnStage, TurnWorkflow};
    use crate::coordinator::MemoryCoordinator;
    use crate::error::EngineError;
    use crate::generate::ResponseGenerator;
    use crate::policy::LengthHeuristic;
    use async_trait::async_trait;
    use mnemos_config::CoordinatorConfig;
    use mnemos_memory::{
        CountSummarizer, DurableMemoryStore, InMemoryDocumentStore, InMemoryListStore,
        LexicalIndex, NoopEventSink, VolatileMessageLog,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    struct StaticGenerator(&'static str);

    #[async_trait]
    impl ResponseGenerator for StaticGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, EngineError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ResponseGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, EngineError> {
            Err(EngineError::GenerationFailed("model offline".to_string()))
        }
    }

    fn coordinator() -> Arc<MemoryCoordinator> {
        let events = Arc::new(NoopEventSink);
        let volatile = Arc::new(VolatileMessageLog::new(
            Arc::new(InMemoryListStore::new()),
            events.clone(),
            20,
            Duration::from_secs(3600),
        ));
        let durable = Arc::new(DurableMemoryStore::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(LexicalIndex::new()),
            events,
            Arc::new(CountSummarizer),
            20,
        ));
        Arc::new(MemoryCoordinator::new(
            volatile,
            durable,
            Arc::new(LengthHeuristic),
            &CoordinatorConfig::default(),
        ))
    }

    #[tokio::test]
    async fn run_threads_state_through_all_stages() {
        let coordinator = coordinator();
        let workflow = TurnWorkflow::new(coordinator.clone(), Arc::new(StaticGenerator("hi!")));

        let context = workflow
            .run("conv", "Hello, how are you?")
            .await
            .expect("turn");
        assert_eq!(context.response.as_deref(), Some("hi!"));
        assert!(context.importance_score.is_some());

        // Both turn messages are now in short-term memory.
        let follow_up = coordinator
            .build_context("conv", "What did I just ask you?")
            .await
            .expect("context");
        assert_eq!(follow_up.recent_messages.len(), 2);
        assert_eq!(follow_up.recent_messages[0].content, "Hello, how are you?");
        assert_eq!(follow_up.recent_messages[1].content, "hi!");
    }

    #[tokio::test]
    async fn generator_failure_is_tagged_and_writes_nothing() {
        let coordinator = coordinator();
        let workflow = TurnWorkflow::new(coordinator.clone(), Arc::new(FailingGenerator));

        let err = workflow
            .run("conv", "Hello")
            .await
            .expect_err("should fail");
        match err {
            EngineError::Stage { stage, source } => {
                assert_eq!(stage, TurnStage::GenerateResponse);
                assert!(matches!(*source, EngineError::GenerationFailed(_)));
            }
            other => panic!("unexpected error: {other}"),
        }

        // Failure before the persist stage leaves memory untouched.
        let context = coordinator
            .build_context("conv", "Hello")
            .await
            .expect("context");
        assert_eq!(context.recent_messages, Vec::new());
    }

    #[test]
    fn stage_names_are_stable() {
        assert_eq!(TurnStage::RetrieveContext.as_str(), "retrieve_context");
        assert_eq!(TurnStage::GenerateResponse.as_str(), "generate_response");
        assert_eq!(TurnStage::PersistTurn.as_str(), "persist_turn");
    }
}
