//! Per-turn conversation context.

use mnemos_memory::{Message, RetrievedMemory};

/// Mutable state threaded through one turn of the workflow.
///
/// One instance per turn invocation, never shared across turns. Each stage
/// writes its output through a named setter and the context is discarded
/// after the turn completes.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    /// Conversation the turn belongs to.
    pub conversation_id: String,
    /// Raw user input for this turn.
    pub current_input: String,
    /// Recent messages in chronological order (oldest first).
    pub recent_messages: Vec<Message>,
    /// Durable memories in descending relevance order.
    pub relevant_memories: Vec<RetrievedMemory>,
    /// In-flight response, set by the generate stage.
    pub response: Option<String>,
    /// Importance score, set by the persist stage.
    pub importance_score: Option<f64>,
}

impl ConversationContext {
    /// Create the initial context for a turn.
    pub fn new(conversation_id: impl Into<String>, current_input: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            current_input: current_input.into(),
            recent_messages: Vec::new(),
            relevant_memories: Vec::new(),
            response: None,
            importance_score: None,
        }
    }

    /// Record the output of the retrieve stage.
    pub fn set_retrieved(
        &mut self,
        recent_messages: Vec<Message>,
        relevant_memories: Vec<RetrievedMemory>,
    ) {
        self.recent_messages = recent_messages;
        self.relevant_memories = relevant_memories;
    }

    /// Record the output of the generate stage.
    pub fn set_response(&mut self, response: String) {
        self.response = Some(response);
    }

    /// Record the output of the persist stage.
    pub fn set_importance(&mut self, importance: f64) {
        self.importance_score = Some(importance);
    }
}
