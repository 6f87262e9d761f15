//! Public SDK surface for Mnemos.
//!
//! This crate re-exports the core building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use mnemos_config as config;
pub use mnemos_core as core;
/// Re-export for convenience.
pub use mnemos_memory as memory;

pub use mnemos_config::{MnemosConfig, load_config};
pub use mnemos_core::{EngineError, MemoryEngine, ResponseGenerator, TurnOutcome};
pub use mnemos_memory::{BroadcastEventBus, MemoryEvent, MemoryEventKind, RetrievedMemory};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
