//! Opaque text-generation capability.

use crate::error::EngineError;
use async_trait::async_trait;

/// The language-model backend, consumed as a single opaque capability.
///
/// The core only guarantees the composed prompt it passes in; whether and
/// how the generator uses the included memories is its own responsibility.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Generate response text for the composed prompt.
    ///
    /// Failures surface as [`EngineError::GenerationFailed`]; the core does
    /// not retry.
    async fn generate(&self, prompt: &str) -> Result<String, EngineError>;
}
