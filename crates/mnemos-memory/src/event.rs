//! Memory lifecycle events and fire-and-forget publication.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Lifecycle stage an event reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemoryEventKind {
    /// A memory was written.
    Created,
    /// A memory view was refreshed.
    Updated,
    /// Memories were read back for a query.
    Retrieved,
    /// A memory was removed.
    Deleted,
}

impl MemoryEventKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryEventKind::Created => "created",
            MemoryEventKind::Updated => "updated",
            MemoryEventKind::Retrieved => "retrieved",
            MemoryEventKind::Deleted => "deleted",
        }
    }
}

/// Notification envelope for a memory lifecycle event. Write-once and
/// fire-and-forget; no acknowledgement is awaited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryEvent {
    /// Lifecycle stage.
    pub kind: MemoryEventKind,
    /// Conversation the event belongs to.
    pub conversation_id: String,
    /// Open event payload.
    pub payload: serde_json::Value,
    /// Assigned at publish time.
    pub emitted_at: DateTime<Utc>,
}

impl MemoryEvent {
    /// Build an event stamped with the current time.
    pub fn now(
        kind: MemoryEventKind,
        conversation_id: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            kind,
            conversation_id: conversation_id.into(),
            payload,
            emitted_at: Utc::now(),
        }
    }
}

/// Sink for memory events. Emission is infallible at the call site: a sink
/// that cannot deliver drops the event instead of failing the owning
/// operation.
pub trait MemoryEventSink: Send + Sync {
    /// Publish an event, at most once, without awaiting acknowledgement.
    fn emit(&self, event: MemoryEvent);
}

/// Broadcast-backed event bus for in-process subscribers.
#[derive(Clone, Debug)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<MemoryEvent>,
}

impl BroadcastEventBus {
    /// Create a new event bus with the given channel buffer size.
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer);
        debug!("memory event bus initialized (buffer={})", buffer);
        Self { sender }
    }

    /// Subscribe to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<MemoryEvent> {
        self.sender.subscribe()
    }
}

impl MemoryEventSink for BroadcastEventBus {
    /// Emit an event into the broadcast channel; no subscribers is fine.
    fn emit(&self, event: MemoryEvent) {
        let _ = self.sender.send(event);
    }
}

/// Sink that discards every event, for wiring without a consumer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl MemoryEventSink for NoopEventSink {
    fn emit(&self, _event: MemoryEvent) {}
}

#[cfg(test)]
mod tests {
    use super::{BroadcastEventBus, MemoryEvent, MemoryEventKind, MemoryEventSink, NoopEventSink};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn broadcast_bus_delivers_to_subscriber() {
        let bus = BroadcastEventBus::new(8);
        let mut receiver = bus.subscribe();
        let event = MemoryEvent::now(MemoryEventKind::Created, "conv-1", json!({"n": 1}));
        bus.emit(event.clone());

        let delivered = receiver.try_recv().expect("event");
        assert_eq!(delivered, event);
    }

    #[test]
    fn emit_without_subscribers_is_dropped() {
        let bus = BroadcastEventBus::new(8);
        bus.emit(MemoryEvent::now(
            MemoryEventKind::Retrieved,
            "conv-1",
            json!({}),
        ));
        NoopEventSink.emit(MemoryEvent::now(
            MemoryEventKind::Deleted,
            "conv-1",
            json!({}),
        ));
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_value(MemoryEventKind::Retrieved).expect("serialize");
        assert_eq!(json, "retrieved");
        assert_eq!(MemoryEventKind::Updated.as_str(), "updated");
    }
}
