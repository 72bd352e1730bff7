//! Local vector store provider
//!
//! Wraps the file-backed VectorStore and moves its blocking work off the
//! async runtime.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::QaConfig;
use crate::error::{Error, Result};
use crate::retrieval::VectorStore;
use crate::types::{Chunk, ChunkRecord, KnowledgeBaseStats, SearchHit};

use super::vector_store::VectorStoreProvider;

/// Local vector store wrapping the JSON-persisted collection
pub struct LocalVectorStore {
    store: Arc<VectorStore>,
}

impl LocalVectorStore {
    /// Create from existing VectorStore
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self { store }
    }

    /// Create from config
    pub fn from_config(config: &QaConfig) -> Result<Self> {
        let store = Arc::new(VectorStore::new(config)?);
        Ok(Self { store })
    }

    /// Get underlying store for direct access
    pub fn inner(&self) -> &Arc<VectorStore> {
        &self.store
    }

    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&VectorStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl VectorStoreProvider for LocalVectorStore {
    async fn upsert_chunks(&self, chunks: &[Chunk]) -> Result<usize> {
        let chunks = chunks.to_vec();
        self.blocking(move |store| store.upsert(&chunks)).await
    }

    async fn search(&self, query_embedding: &[f32], n_results: usize) -> Result<Vec<SearchHit>> {
        let query = query_embedding.to_vec();
        self.blocking(move |store| store.search(&query, n_results))
            .await
    }

    async fn get_all(&self) -> Result<Vec<ChunkRecord>> {
        Ok(self.store.get_all())
    }

    async fn get_by_source(&self, source: &str) -> Result<Vec<ChunkRecord>> {
        Ok(self.store.get_by_source(source))
    }

    async fn clear(&self) -> Result<()> {
        self.blocking(|store| store.clear()).await
    }

    async fn stats(&self) -> Result<KnowledgeBaseStats> {
        Ok(self.store.stats())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.store.len())
    }

    fn name(&self) -> &str {
        "local-json"
    }
}
