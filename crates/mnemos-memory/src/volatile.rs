//! Volatile short-term message log.

use crate::backend::ListStore;
use crate::error::MemoryError;
use crate::event::{MemoryEvent, MemoryEventKind, MemoryEventSink};
use crate::model::{Message, ensure_conversation_id};
use log::debug;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Tier tag carried in event payloads from this log.
const SHORT_TERM: &str = "short_term";

/// Append-only, capacity-bounded, TTL-expiring ordered log of turn messages
/// per conversation. The backing store holds messages newest-first; reads
/// reverse to chronological order.
pub struct VolatileMessageLog {
    /// Backing list store.
    store: Arc<dyn ListStore>,
    /// Sink for lifecycle events.
    events: Arc<dyn MemoryEventSink>,
    /// Maximum messages retained per conversation.
    max_messages: usize,
    /// Inactivity TTL for a conversation's log.
    ttl: Duration,
}

impl VolatileMessageLog {
    /// Create a new log over the given store.
    pub fn new(
        store: Arc<dyn ListStore>,
        events: Arc<dyn MemoryEventSink>,
        max_messages: usize,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            events,
            max_messages,
            ttl,
        }
    }

    /// Build the store key for a conversation.
    fn conversation_key(conversation_id: &str) -> String {
        format!("conversation:{conversation_id}:messages")
    }

    /// Append a message, trim to capacity, and reset the conversation TTL.
    ///
    /// Store failures surface to the caller; there is no silent retry here.
    pub async fn append(
        &self,
        conversation_id: &str,
        message: &Message,
    ) -> Result<(), MemoryError> {
        ensure_conversation_id(conversation_id)?;
        let key = Self::conversation_key(conversation_id);
        let serialized = serde_json::to_string(message)?;

        self.store.push_head(&key, &serialized).await?;
        self.store.trim(&key, self.max_messages).await?;
        self.store.expire(&key, self.ttl).await?;
        debug!(
            "appended volatile message (conversation_id={}, role={}, content_len={})",
            conversation_id,
            message.role.as_str(),
            message.content.len()
        );

        self.events.emit(MemoryEvent::now(
            MemoryEventKind::Created,
            conversation_id,
            json!({
                "tier": SHORT_TERM,
                "role": message.role.as_str(),
                "content": message.content,
            }),
        ));
        Ok(())
    }

    /// Return up to `limit` most recent messages in chronological order.
    ///
    /// An absent or expired conversation yields an empty sequence, not an
    /// error. `limit` defaults to the configured maximum.
    pub async fn recent(
        &self,
        conversation_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, MemoryError> {
        ensure_conversation_id(conversation_id)?;
        let key = Self::conversation_key(conversation_id);
        let limit = limit.unwrap_or(self.max_messages);

        let raw = self.store.range(&key, limit).await?;
        let mut messages = raw
            .iter()
            .map(|value| serde_json::from_str(value).map_err(MemoryError::Serde))
            .collect::<Result<Vec<Message>, MemoryError>>()?;
        messages.reverse();

        self.events.emit(MemoryEvent::now(
            MemoryEventKind::Updated,
            conversation_id,
            json!({
                "tier": SHORT_TERM,
                "message_count": messages.len(),
            }),
        ));
        Ok(messages)
    }

    /// Delete all messages for a conversation; idempotent.
    pub async fn clear(&self, conversation_id: &str) -> Result<(), MemoryError> {
        ensure_conversation_id(conversation_id)?;
        let key = Self::conversation_key(conversation_id);
        self.store.remove(&key).await?;
        debug!("cleared volatile log (conversation_id={})", conversation_id);
        Ok(())
    }
}
