//! Embedding-backed knowledge base over the vector store

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::{Chunk, ChunkRecord, KnowledgeBaseStats, SearchHit};

/// Embeds chunks and queries, and delegates storage to a vector store
#[derive(Clone)]
pub struct KnowledgeBase {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
}

impl KnowledgeBase {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStoreProvider>) -> Self {
        Self { embedder, store }
    }

    /// Embedding provider in use
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Embed and store chunks; returns the number stored
    pub async fn add_chunks(&self, mut chunks: Vec<Chunk>) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        let stored = self.store.upsert_chunks(&chunks).await?;
        tracing::debug!("Stored {} chunks via {}", stored, self.store.name());
        Ok(stored)
    }

    /// Chunks most similar to `query`, closest first
    pub async fn search(&self, query: &str, n_results: usize) -> Result<Vec<SearchHit>> {
        if n_results == 0 || self.store.is_empty().await? {
            return Ok(Vec::new());
        }
        let embedding = self.embedder.embed(query).await?;
        self.store.search(&embedding, n_results).await
    }

    pub async fn get_all(&self) -> Result<Vec<ChunkRecord>> {
        self.store.get_all().await
    }

    /// Stored chunks of one source document, in insertion order
    pub async fn get_by_source(&self, source: &str) -> Result<Vec<ChunkRecord>> {
        self.store.get_by_source(source).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }

    pub async fn stats(&self) -> Result<KnowledgeBaseStats> {
        self.store.stats().await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        self.store.is_empty().await
    }
}
