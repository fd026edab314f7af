//! Traits for completion provider implementations

use super::types::CompletionOptions;
use crate::llm::errors::LLMError;
use async_trait::async_trait;

/// A single-turn text completion endpoint.
///
/// Implementations send `prompt` as one user message and return the model's
/// reply verbatim. They never retry; that is the pipeline's job.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Get the model ID being used
    fn model(&self) -> &str;

    /// Check if the provider is reachable
    async fn is_available(&self) -> bool;

    /// Complete a single user prompt
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String, LLMError>;
}
