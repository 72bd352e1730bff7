//! Ingestion pipeline orchestration

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::types::{Chunk, Document};

use super::chunker::TextChunker;
use super::parser::DocumentProcessor;

/// Main ingestion pipeline
#[derive(Debug, Clone)]
pub struct IngestPipeline {
    /// Format dispatch
    processor: DocumentProcessor,
    /// Text chunker
    chunker: TextChunker,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            processor: DocumentProcessor::new(),
            chunker: TextChunker::new(chunk_size, chunk_overlap),
        }
    }

    /// Create a pipeline from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self {
            processor: DocumentProcessor::new(),
            chunker: TextChunker::from_config(config),
        }
    }

    /// The chunker used for extracted text
    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Extract the text of a file
    pub fn parse_file(&self, filename: &str, data: &[u8]) -> Result<Document> {
        self.processor.process(filename, data)
    }

    /// Full ingestion: parse + chunk
    pub fn ingest(&self, filename: &str, data: &[u8]) -> Result<(Document, Vec<Chunk>)> {
        let doc = self.parse_file(filename, data)?;
        let chunks = self.chunker.split(&doc.content, &doc.chunk_metadata());

        tracing::debug!("'{}' produced {} chunks", filename, chunks.len());

        Ok((doc, chunks))
    }
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}
