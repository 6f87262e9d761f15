//! Walks one conversation through the engine: two turns, a cross-turn
//! memory question, and a search over what was retained.
//!
//! Run with: `cargo run -p mnemos --example conversation`

use mnemos::{BroadcastEventBus, MemoryEngine, MnemosConfig};
use mnemos_test_utils::EchoGenerator;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    mnemos::init_logging();

    let config = MnemosConfig::default();
    let events = Arc::new(BroadcastEventBus::new(config.events.buffer));
    let mut event_stream = events.subscribe();
    let engine = MemoryEngine::in_memory(&config, Arc::new(EchoGenerator), events);

    let first = engine
        .process_turn(None, "Hello! My name is Alice and I love hiking in the mountains.")
        .await?;
    println!("assistant: {}", first.response);
    println!("(importance {:.2})", first.importance_score);

    let second = engine
        .process_turn(Some(&first.conversation_id), "What did I just tell you about myself?")
        .await?;
    println!("assistant: {}", second.response);

    let memories = engine
        .search_memories("Alice hiking", Some(&first.conversation_id), None)
        .await?;
    for memory in &memories {
        println!("recalled ({:.2}): {}", memory.relevance, memory.content);
    }

    while let Ok(event) = event_stream.try_recv() {
        println!("event: {} ({})", event.kind.as_str(), event.conversation_id);
    }
    Ok(())
}
