//! Application state for the QA agent server

use dashmap::DashMap;
use std::sync::Arc;

use crate::config::QaConfig;
use crate::error::{Error, Result};
use crate::generation::QaAgent;
use crate::ingestion::IngestPipeline;
use crate::providers::{
    build_llm, EmbeddingProvider, LlmProvider, LocalVectorStore, OllamaEmbedder,
    VectorStoreProvider,
};
use crate::retrieval::KnowledgeBase;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: QaConfig,
    /// Extraction and chunking
    pipeline: IngestPipeline,
    /// Embedder plus vector store
    knowledge_base: KnowledgeBase,
    /// LLM provider, or the reason it could not be built
    llm: std::result::Result<Arc<dyn LlmProvider>, String>,
    /// Raw HTML of uploaded pages by filename
    html_pages: DashMap<String, String>,
}

impl AppState {
    /// Create state backed by Ollama embeddings and the local vector store
    pub async fn new(config: QaConfig) -> Result<Self> {
        tracing::info!("Initializing QA agent state...");

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbedder::new(&config)?);
        let store: Arc<dyn VectorStoreProvider> = Arc::new(LocalVectorStore::from_config(&config)?);
        tracing::info!(
            "Vector store ready ({} chunks, {})",
            store.len().await?,
            config.storage.collection_path().display()
        );

        let llm = build_llm(&config).map_err(|e| {
            tracing::warn!("LLM unavailable, generation requests will fail: {}", e);
            e.to_string()
        });

        Ok(Self::build(config, embedder, store, llm))
    }

    /// Create state from explicit providers; `None` disables generation
    pub fn with_providers(
        config: QaConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        llm: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        let llm = llm.ok_or_else(|| "No LLM provider configured".to_string());
        Self::build(config, embedder, store, llm)
    }

    fn build(
        config: QaConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        llm: std::result::Result<Arc<dyn LlmProvider>, String>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pipeline: IngestPipeline::from_config(&config.chunking),
                knowledge_base: KnowledgeBase::new(embedder, store),
                llm,
                html_pages: DashMap::new(),
                config,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &QaConfig {
        &self.inner.config
    }

    /// Get the ingestion pipeline
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Get the knowledge base
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.inner.knowledge_base
    }

    /// LLM provider, if one could be configured
    pub fn llm(&self) -> Option<&Arc<dyn LlmProvider>> {
        self.inner.llm.as_ref().ok()
    }

    /// Agent for generation requests
    pub fn agent(&self) -> Result<QaAgent> {
        match &self.inner.llm {
            Ok(llm) => Ok(QaAgent::new(self.inner.knowledge_base.clone(), Arc::clone(llm))),
            Err(reason) => Err(Error::Config(reason.clone())),
        }
    }

    /// Parse, chunk and store one file; returns the number of chunks stored
    pub async fn ingest(&self, filename: &str, data: Vec<u8>) -> Result<usize> {
        let pipeline = self.inner.pipeline.clone();
        let name = filename.to_string();
        let (_, chunks) = tokio::task::spawn_blocking(move || pipeline.ingest(&name, &data))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        self.inner.knowledge_base.add_chunks(chunks).await
    }

    /// Remember the raw HTML of an uploaded page
    pub fn store_html(&self, filename: &str, html: String) {
        self.inner.html_pages.insert(filename.to_string(), html);
    }

    /// Raw HTML of an uploaded page
    pub fn html_page(&self, filename: &str) -> Option<String> {
        self.inner.html_pages.get(filename).map(|page| page.value().clone())
    }

    /// Filenames of uploaded pages, sorted
    pub fn html_files(&self) -> Vec<String> {
        let mut files: Vec<String> = self
            .inner
            .html_pages
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        files.sort();
        files
    }

    /// Forget all uploaded pages
    pub fn clear_html(&self) {
        self.inner.html_pages.clear();
    }

    /// Check if ready
    pub fn is_ready(&self) -> bool {
        self.inner.llm.is_ok()
    }
}
