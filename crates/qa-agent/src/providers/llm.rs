//! LLM provider trait for text generation

use async_trait::async_trait;

use crate::error::Result;

/// Trait for prompt completion
///
/// Implementations:
/// - `GroqLlm`: Groq cloud API (llama-3.1-70b-versatile)
/// - `OllamaLlm`: Local Ollama server (llama3.1)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete `prompt`, optionally steered by a system prompt
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
