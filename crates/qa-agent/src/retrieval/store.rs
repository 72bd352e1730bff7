//! File-backed vector collection with brute-force cosine search

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::config::QaConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkRecord, KnowledgeBaseStats, Metadata, SearchHit, SOURCE_DOCUMENT_KEY};

/// One stored chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    id: String,
    content: String,
    metadata: Metadata,
    embedding: Vec<f32>,
}

impl StoredEntry {
    fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_DOCUMENT_KEY).and_then(|v| v.as_str())
    }

    fn to_record(&self) -> ChunkRecord {
        ChunkRecord {
            content: self.content.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Entries in insertion order plus an id index
#[derive(Debug, Clone, Default)]
struct Collection {
    entries: Vec<StoredEntry>,
    positions: HashMap<String, usize>,
}

impl Collection {
    fn from_entries(entries: Vec<StoredEntry>) -> Self {
        let mut collection = Self::default();
        for entry in entries {
            collection.upsert(entry);
        }
        collection
    }

    fn upsert(&mut self, entry: StoredEntry) {
        match self.positions.get(&entry.id) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.positions.insert(entry.id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }
}

/// Vector store holding `(id, text, metadata, embedding)` entries
///
/// Every mutation is written to the JSON file the store was opened with
/// before it becomes visible in memory; a failed write leaves the store
/// unchanged. An in-memory store skips persistence.
pub struct VectorStore {
    /// Persistence file, `None` for in-memory stores
    path: Option<PathBuf>,
    /// Embedding dimensions
    dimensions: usize,
    collection: RwLock<Collection>,
}

impl VectorStore {
    /// Open the collection configured in `config`
    pub fn new(config: &QaConfig) -> Result<Self> {
        Self::open(config.storage.collection_path(), config.embeddings.dimensions)
    }

    /// Open or create a persisted collection
    pub fn open(path: impl Into<PathBuf>, dimensions: usize) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = load_entries(&path);
        tracing::info!(
            "Opened vector store at {} ({} chunks)",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path: Some(path),
            dimensions,
            collection: RwLock::new(Collection::from_entries(entries)),
        })
    }

    /// Create a store that is never written to disk
    pub fn in_memory(dimensions: usize) -> Self {
        Self {
            path: None,
            dimensions,
            collection: RwLock::new(Collection::default()),
        }
    }

    /// Embedding dimensions accepted by this store
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Insert chunks, overwriting entries with the same id in place
    ///
    /// The batch is rejected as a whole when any chunk lacks an embedding of
    /// the store's dimension.
    pub fn upsert(&self, chunks: &[Chunk]) -> Result<usize> {
        for chunk in chunks {
            if chunk.embedding.is_empty() {
                return Err(Error::vector_db(format!("Chunk {} has no embedding", chunk.id)));
            }
            if chunk.embedding.len() != self.dimensions {
                return Err(Error::vector_db(format!(
                    "Chunk {} has {} dimensions, expected {}",
                    chunk.id,
                    chunk.embedding.len(),
                    self.dimensions
                )));
            }
        }

        let mut collection = self.collection.write();
        let mut next = collection.clone();
        for chunk in chunks {
            next.upsert(StoredEntry {
                id: chunk.id.clone(),
                content: chunk.text.clone(),
                metadata: chunk.to_vector_metadata(),
                embedding: chunk.embedding.clone(),
            });
        }
        self.persist(&next)?;
        *collection = next;

        Ok(chunks.len())
    }

    /// Closest `n_results` entries by cosine distance, ascending
    pub fn search(&self, query_embedding: &[f32], n_results: usize) -> Result<Vec<SearchHit>> {
        if query_embedding.len() != self.dimensions {
            return Err(Error::vector_db(format!(
                "Query has {} dimensions, expected {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        let collection = self.collection.read();
        let mut scored: Vec<(f32, &StoredEntry)> = collection
            .entries
            .iter()
            .map(|entry| (1.0 - cosine_similarity(query_embedding, &entry.embedding), entry))
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(n_results);

        Ok(scored
            .into_iter()
            .map(|(distance, entry)| SearchHit {
                content: entry.content.clone(),
                metadata: entry.metadata.clone(),
                distance,
            })
            .collect())
    }

    /// Every entry in insertion order
    pub fn get_all(&self) -> Vec<ChunkRecord> {
        self.collection
            .read()
            .entries
            .iter()
            .map(StoredEntry::to_record)
            .collect()
    }

    /// Entries whose `source_document` equals `source`
    pub fn get_by_source(&self, source: &str) -> Vec<ChunkRecord> {
        self.collection
            .read()
            .entries
            .iter()
            .filter(|entry| entry.source() == Some(source))
            .map(StoredEntry::to_record)
            .collect()
    }

    /// Drop every entry
    pub fn clear(&self) -> Result<()> {
        let mut collection = self.collection.write();
        self.persist(&Collection::default())?;
        collection.clear();
        Ok(())
    }

    /// Chunk count and distinct sources
    pub fn stats(&self) -> KnowledgeBaseStats {
        let collection = self.collection.read();
        let sources: BTreeSet<&str> = collection
            .entries
            .iter()
            .filter_map(StoredEntry::source)
            .collect();

        KnowledgeBaseStats {
            total_chunks: collection.entries.len(),
            unique_sources: sources.len(),
            sources: sources.into_iter().map(str::to_string).collect(),
        }
    }

    /// Get chunk count
    pub fn len(&self) -> usize {
        self.collection.read().entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, collection: &Collection) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let data = serde_json::to_vec(&collection.entries)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> Vec<StoredEntry> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!("Could not read vector store {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_slice(&data) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                "Ignoring corrupt vector store {}: {}",
                path.display(),
                e
            );
            Vec::new()
        }
    }
}

/// Cosine similarity; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
