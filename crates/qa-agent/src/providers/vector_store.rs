//! Vector store provider trait for storing and searching embeddings

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Chunk, ChunkRecord, KnowledgeBaseStats, SearchHit};

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `LocalVectorStore`: file-backed brute-force cosine store
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Insert or overwrite embedded chunks, keyed by chunk id
    async fn upsert_chunks(&self, chunks: &[Chunk]) -> Result<usize>;

    /// Nearest chunks to `query_embedding`, closest first
    async fn search(&self, query_embedding: &[f32], n_results: usize) -> Result<Vec<SearchHit>>;

    /// Every stored chunk in insertion order
    async fn get_all(&self) -> Result<Vec<ChunkRecord>>;

    /// Stored chunks of one source document
    async fn get_by_source(&self, source: &str) -> Result<Vec<ChunkRecord>>;

    /// Remove every chunk
    async fn clear(&self) -> Result<()>;

    /// Collection statistics
    async fn stats(&self) -> Result<KnowledgeBaseStats>;

    /// Get total number of vectors stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Get provider name for logging
    fn name(&self) -> &str;
}
