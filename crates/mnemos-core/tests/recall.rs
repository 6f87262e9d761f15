//! Cross-turn retention, search scoping, summaries, and lifecycle events.

use mnemos_config::MnemosConfig;
use mnemos_core::{LengthHeuristic, MemoryCoordinator, MemoryEngine};
use mnemos_memory::{
    CountSummarizer, DurableMemoryStore, InMemoryDocumentStore, InMemoryListStore, LexicalIndex,
    MemoryEventKind, MemoryEventSink, Message, NoopEventSink, VolatileMessageLog,
};
use mnemos_test_utils::{CollectingEventSink, EchoGenerator, FixedGenerator};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn coordinator(events: Arc<dyn MemoryEventSink>) -> (MemoryCoordinator, Arc<DurableMemoryStore>) {
    let config = MnemosConfig::default();
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
    let coordinator = MemoryCoordinator::new(
        volatile,
        durable.clone(),
        Arc::new(LengthHeuristic),
        &config.coordinator,
    );
    (coordinator, durable)
}

/// An important fact should be findable later, but only in its conversation.
#[tokio::test]
async fn important_fact_is_searchable_within_its_conversation() {
    let (coordinator, _durable) = coordinator(Arc::new(NoopEventSink));
    coordinator
        .record_message("conv-1", &Message::user("User's name is Alice"), Some(0.9))
        .await
        .expect("record");

    let hits = coordinator
        .search_memories("What is the user's name?", Some("conv-1"), 5)
        .await
        .expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "User's name is Alice");
    assert!(hits[0].relevance > 0.0);

    let other = coordinator
        .search_memories("What is the user's name?", Some("conv-2"), 5)
        .await
        .expect("search");
    assert_eq!(other, Vec::new());
}

/// Unscoped search should span conversations.
#[tokio::test]
async fn unscoped_search_spans_conversations() {
    let (coordinator, _durable) = coordinator(Arc::new(NoopEventSink));
    coordinator
        .record_message("conv-1", &Message::user("Alice likes hiking"), Some(0.8))
        .await
        .expect("record");
    coordinator
        .record_message("conv-2", &Message::user("Bob likes hiking"), Some(0.8))
        .await
        .expect("record");

    let hits = coordinator
        .search_memories("who likes hiking", None, 5)
        .await
        .expect("search");
    assert_eq!(hits.len(), 2);
}

/// Summaries count promoted messages; empty conversations yield nothing.
#[tokio::test]
async fn summarize_counts_promoted_messages() {
    let (coordinator, durable) = coordinator(Arc::new(NoopEventSink));
    for i in 0..3 {
        coordinator
            .record_message("conv", &Message::user(format!("important fact {i}")), Some(0.9))
            .await
            .expect("record");
    }

    let summary_id = coordinator
        .summarize("conv")
        .await
        .expect("summarize")
        .expect("summary id");
    let entry = durable
        .entry(&summary_id)
        .await
        .expect("lookup")
        .expect("entry");
    assert_eq!(entry.content, "Conversation with 3 messages");
    assert_eq!(entry.importance, 1.0);

    let empty = coordinator.summarize("untouched").await.expect("summarize");
    assert_eq!(empty, None);
}

/// A turn without promotion emits two created events plus the read events.
#[tokio::test]
async fn turn_emits_lifecycle_events() {
    let sink = CollectingEventSink::new();
    let engine = MemoryEngine::in_memory(
        &MnemosConfig::default(),
        Arc::new(EchoGenerator),
        Arc::new(sink.clone()),
    );

    engine
        .process_turn(Some("conv"), "Hi")
        .await
        .expect("turn");

    let kinds = sink.kinds();
    assert!(kinds.contains(&MemoryEventKind::Updated));
    assert!(kinds.contains(&MemoryEventKind::Retrieved));
    let created = kinds
        .iter()
        .filter(|kind| **kind == MemoryEventKind::Created)
        .count();
    assert_eq!(created, 2);
}

/// A promoted turn emits a third created event from the durable tier.
#[tokio::test]
async fn promoted_turn_emits_durable_created_event() {
    let sink = CollectingEventSink::new();
    let engine = MemoryEngine::in_memory(
        &MnemosConfig::default(),
        Arc::new(FixedGenerator::new("noted.")),
        Arc::new(sink.clone()),
    );

    engine
        .process_turn(
            Some("conv"),
            "Please remember that my anniversary is on June 12th and that we always \
             celebrate it at the lake house.",
        )
        .await
        .expect("turn");

    let created = sink
        .kinds()
        .into_iter()
        .filter(|kind| *kind == MemoryEventKind::Created)
        .count();
    assert_eq!(created, 3);

    // The durable tier tags two events per promoted turn: the retrieved
    // event from the context search and the created event from promotion.
    let long_term = sink
        .events()
        .into_iter()
        .filter(|event| event.payload["tier"] == "long_term")
        .count();
    assert_eq!(long_term, 2);

    let durable_created = sink
        .events()
        .into_iter()
        .filter(|event| {
            event.kind == MemoryEventKind::Created && event.payload["tier"] == "long_term"
        })
        .count();
    assert_eq!(durable_created, 1);
}
