//! Memory coordination engine.
//!
//! Composes the two memory tiers behind a coordinator, drives the
//! three-stage turn workflow (retrieve context, generate response, persist
//! turn), and exposes the turn API surface consumed by transports.

pub mod context;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod generate;
pub mod policy;
pub mod workflow;

/// Per-turn mutable state.
pub use context::ConversationContext;
/// Orchestration seam between the memory tiers.
pub use coordinator::MemoryCoordinator;
/// Turn API façade.
pub use engine::{MemoryEngine, TurnOutcome};
/// Engine error type.
pub use error::EngineError;
/// Opaque text-generation capability.
pub use generate::ResponseGenerator;
/// Importance scoring strategy.
pub use policy::{ImportancePolicy, LengthHeuristic};
/// Three-stage turn state machine.
pub use workflow::{TurnStage, TurnWorkflow};
