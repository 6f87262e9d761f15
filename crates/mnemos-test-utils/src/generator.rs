use async_trait::async_trait;
use mnemos_core::{EngineError, ResponseGenerator};
use parking_lot::Mutex;
use std::sync::Arc;

/// Mock generator mirroring a context-aware assistant: echoes the current
/// input back and quotes the first retrieved memory when one is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoGenerator;

#[async_trait]
impl ResponseGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, EngineError> {
        let input = prompt
            .lines()
            .rev()
            .find_map(|line| line.strip_prefix("Current user input: "))
            .unwrap_or(prompt);
        let mut response = format!("This is a response to: {input}");

        let mut lines = prompt.lines();
        if lines.any(|line| line == "Relevant information from memory:")
            && let Some(first_memory) = lines.next().and_then(|line| line.strip_prefix("1. "))
        {
            response.push_str(&format!("\n\nI remember: {first_memory}"));
        }
        Ok(response)
    }
}

#[derive(Debug, Clone)]
pub struct FixedGenerator {
    response: String,
}

impl FixedGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl ResponseGenerator for FixedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, EngineError> {
        Ok(self.response.clone())
    }
}

#[derive(Debug, Clone)]
pub struct RecordingGenerator {
    response: String,
    pub last_prompt: Arc<Mutex<Option<String>>>,
}

impl RecordingGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl ResponseGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, EngineError> {
        *self.last_prompt.lock() = Some(prompt.to_string());
        Ok(self.response.clone())
    }
}

#[derive(Debug, Clone)]
pub struct FailingGenerator {
    message: String,
}

impl FailingGenerator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ResponseGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, EngineError> {
        Err(EngineError::GenerationFailed(self.message.clone()))
    }
}
