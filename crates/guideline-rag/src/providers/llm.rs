//! Language model provider trait

use async_trait::async_trait;
use crate::error::Result;

/// Trait for prompt completion
///
/// Implementations:
/// - `OllamaLlm`: Local Ollama server (tinyllama, llama3.2, phi3, ...)
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for a fully built prompt.
    ///
    /// Fails with `Error::GenerationUnavailable` when the model cannot answer.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
