//! Provider abstractions for embeddings, LLM and vector storage
//!
//! Trait-based seams that let the agent run against Groq or a local Ollama
//! server, and against fakes in tests.

pub mod embedding;
pub mod groq;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod retry;
pub mod vector_store;

use std::sync::Arc;

use crate::config::{LlmBackend, QaConfig};
use crate::error::Result;

pub use embedding::EmbeddingProvider;
pub use groq::GroqLlm;
pub use llm::LlmProvider;
pub use local::LocalVectorStore;
pub use ollama::{OllamaEmbedder, OllamaLlm};
pub use vector_store::VectorStoreProvider;

/// Build the LLM selected by `llm.provider`
pub fn build_llm(config: &QaConfig) -> Result<Arc<dyn LlmProvider>> {
    let llm: Arc<dyn LlmProvider> = match config.llm.provider {
        LlmBackend::Groq => Arc::new(GroqLlm::new(config)?),
        LlmBackend::Ollama => Arc::new(OllamaLlm::new(config)?),
    };
    tracing::info!("Using LLM provider '{}' (model {})", llm.name(), llm.model());
    Ok(llm)
}
