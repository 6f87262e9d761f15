use mnemos_memory::{MemoryEvent, MemoryEventKind, MemoryEventSink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Event sink that records every emitted event for later inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectingEventSink {
    events: Arc<Mutex<Vec<MemoryEvent>>>,
}

impl CollectingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events emitted so far, in order.
    pub fn events(&self) -> Vec<MemoryEvent> {
        self.events.lock().clone()
    }

    /// Kinds of all events emitted so far, in order.
    pub fn kinds(&self) -> Vec<MemoryEventKind> {
        self.events.lock().iter().map(|event| event.kind).collect()
    }
}

impl MemoryEventSink for CollectingEventSink {
    fn emit(&self, event: MemoryEvent) {
        self.events.lock().push(event);
    }
}
