//! Pluggable summarization strategy for durable memory.

use crate::model::MemoryEntry;

/// Synthesizes a summary text from a window of memory entries.
///
/// The default is a count-based placeholder, not real summarization; an
/// LLM-backed strategy plugs in behind this trait.
pub trait Summarizer: Send + Sync {
    /// Produce summary text for the given entries (most recent first).
    fn summarize(&self, entries: &[MemoryEntry]) -> String;
}

/// Placeholder summarizer reporting only the message count.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountSummarizer;

impl Summarizer for CountSummarizer {
    fn summarize(&self, entries: &[MemoryEntry]) -> String {
        format!("Conversation with {} messages", entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{CountSummarizer, Summarizer};
    use crate::model::{MemoryEntry, MemoryKind};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn count_summarizer_reports_entry_count() {
        let entries: Vec<MemoryEntry> = (0..3)
            .map(|i| MemoryEntry {
                id: i.to_string(),
                conversation_id: "conv".to_string(),
                content: format!("m{i}"),
                kind: MemoryKind::Message,
                importance: 0.5,
                metadata: json!({}),
                created_at: Utc::now(),
            })
            .collect();
        assert_eq!(
            CountSummarizer.summarize(&entries),
            "Conversation with 3 messages"
        );
    }
}
