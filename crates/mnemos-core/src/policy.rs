//! Pluggable importance scoring.

use crate::context::ConversationContext;

/// Scores how important a message is for long-term retention.
///
/// Implementations must be pure: no side effects, and identical inputs must
/// yield identical scores within a turn. A trained model plugs in behind
/// this trait; the default is a documented length heuristic.
pub trait ImportancePolicy: Send + Sync {
    /// Score the content against the pre-response turn context, in [0, 1].
    fn score(&self, content: &str, context: &ConversationContext) -> f64;
}

/// Length-based placeholder heuristic: `min(len / 100, 1.0) * 0.7`.
///
/// Monotonic in content length and capped before scaling, so it is
/// deliberately conservative: long messages approach but never reach
/// summary-level importance.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthHeuristic;

impl ImportancePolicy for LengthHeuristic {
    fn score(&self, content: &str, _context: &ConversationContext) -> f64 {
        let length_factor = (content.chars().count() as f64 / 100.0).min(1.0);
        length_factor * 0.7
    }
}
