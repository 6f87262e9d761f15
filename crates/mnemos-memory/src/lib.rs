//! Two-tier conversation memory for AI agents.
//!
//! The volatile tier is a recency-ordered, capacity-bounded, TTL-expiring
//! message log; the durable tier persists memory entries and indexes their
//! content for similarity search. Both tiers sit on narrow backend traits so
//! real stores (a key-value cache, a document database, a vector engine) can
//! plug in behind the same contracts as the bundled in-memory defaults.

pub mod backend;
pub mod durable;
pub mod error;
pub mod event;
pub mod model;
pub mod policy;
pub mod volatile;

/// Memory error type.
pub use error::MemoryError;
/// Backend traits and in-memory default implementations.
pub use backend::{
    DocumentStore, EntryQuery, InMemoryDocumentStore, InMemoryListStore, LexicalIndex, ListStore,
    SearchFilter, SimilarityIndex,
};
/// Durable long-term memory store.
pub use durable::DurableMemoryStore;
/// Event envelope, sink trait, and bundled sinks.
pub use event::{BroadcastEventBus, MemoryEvent, MemoryEventKind, MemoryEventSink, NoopEventSink};
/// Core data model.
pub use model::{
    MemoryEntry, MemoryKind, MemorySource, Message, RetrievedMemory, Role, ScoredDocument,
    ensure_conversation_id, ensure_importance,
};
/// Summarization strategy.
pub use policy::{CountSummarizer, Summarizer};
/// Volatile short-term message log.
pub use volatile::VolatileMessageLog;
