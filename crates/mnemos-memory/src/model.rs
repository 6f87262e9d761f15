//! Data model shared by both memory tiers.

use crate::error::MemoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker role for a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-generated message.
    System,
    /// User-authored message.
    User,
    /// Assistant-authored message.
    Assistant,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Label used when rendering a transcript for a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One utterance in a conversation. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role that produced the message.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Timestamp for the message.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a message with the current timestamp.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Kind tag for a durable memory entry. The set is open: unknown kinds
/// round-trip through `Other` instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum MemoryKind {
    /// A promoted conversation message.
    Message,
    /// A synthesized conversation summary.
    Summary,
    /// A standalone fact.
    Fact,
    /// A user preference.
    Preference,
    /// Any other kind tag.
    Other(String),
}

impl MemoryKind {
    /// Return the kind as a string tag.
    pub fn as_str(&self) -> &str {
        match self {
            MemoryKind::Message => "message",
            MemoryKind::Summary => "summary",
            MemoryKind::Fact => "fact",
            MemoryKind::Preference => "preference",
            MemoryKind::Other(kind) => kind,
        }
    }
}

impl From<String> for MemoryKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "message" => MemoryKind::Message,
            "summary" => MemoryKind::Summary,
            "fact" => MemoryKind::Fact,
            "preference" => MemoryKind::Preference,
            _ => MemoryKind::Other(value),
        }
    }
}

impl From<MemoryKind> for String {
    fn from(kind: MemoryKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One durable, searchable memory unit. Never mutated in place; superseding
/// information is stored as a new entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryEntry {
    /// Store-assigned identifier, unique and immutable.
    pub id: String,
    /// Conversation the entry belongs to.
    pub conversation_id: String,
    /// Entry content.
    pub content: String,
    /// Kind tag for filtering.
    pub kind: MemoryKind,
    /// Importance score in [0, 1].
    pub importance: f64,
    /// Open metadata for recall and filtering.
    pub metadata: serde_json::Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Which tier a retrieved memory came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemorySource {
    /// Short-term message log.
    Volatile,
    /// Long-term memory store.
    Durable,
}

/// Ephemeral projection of a memory used only for response composition.
/// Never persisted; constructed fresh per retrieval call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedMemory {
    /// Retrieved content.
    pub content: String,
    /// Tier the content came from.
    pub source: MemorySource,
    /// Similarity-engine relevance, higher is more relevant.
    pub relevance: f64,
    /// Metadata passed through from the index.
    pub metadata: serde_json::Value,
}

/// One ranked document returned by a similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    /// Indexed content.
    pub content: String,
    /// Metadata the content was indexed with.
    pub metadata: serde_json::Value,
    /// Engine-assigned relevance score.
    pub relevance: f64,
}

/// Reject empty conversation ids before they reach a backend.
pub fn ensure_conversation_id(conversation_id: &str) -> Result<(), MemoryError> {
    if conversation_id.trim().is_empty() {
        return Err(MemoryError::Validation(
            "conversation id must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Reject importance scores outside [0, 1].
pub fn ensure_importance(importance: f64) -> Result<(), MemoryError> {
    if !(0.0..=1.0).contains(&importance) {
        return Err(MemoryError::Validation(format!(
            "importance must be within [0, 1], got {importance}"
        )));
    }
    Ok(())
}
