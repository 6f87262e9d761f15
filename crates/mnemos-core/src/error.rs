//! Error types for the coordination engine.

use crate::workflow::TurnStage;
use mnemos_memory::MemoryError;
use thiserror::Error;

/// Errors returned by the coordinator, workflow, and engine façade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// One or both context reads failed; the coordinator never returns
    /// partial context. Recoverable; the whole turn may be retried.
    #[error("context unavailable: {0}")]
    ContextUnavailable(String),
    /// The opaque generator failed. Surfaced verbatim, no retry in the core.
    #[error("generation failed: {0}")]
    GenerationFailed(String),
    /// Memory tier error.
    #[error(transparent)]
    Memory(#[from] MemoryError),
    /// A workflow stage failed; the whole turn is treated as failed.
    #[error("{stage} stage failed: {source}")]
    Stage {
        /// Stage that failed.
        stage: TurnStage,
        /// Underlying failure.
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Tag an error with the workflow stage it occurred in.
    pub(crate) fn at_stage(stage: TurnStage, source: EngineError) -> Self {
        EngineError::Stage {
            stage,
            source: Box::new(source),
        }
    }
}
