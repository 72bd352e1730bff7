//! Document and chunk types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::ingestion::identity::chunk_id;

/// Metadata attached to every chunk of a document
pub type Metadata = HashMap<String, serde_json::Value>;

/// Metadata key naming the originating document
pub const SOURCE_DOCUMENT_KEY: &str = "source_document";
/// Metadata key holding the uploaded filename
pub const FILENAME_KEY: &str = "filename";
/// Source label used when a chunk carries no `source_document`
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Supported upload formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Markdown file
    Markdown,
    /// Plain text file
    Txt,
    /// JSON document
    Json,
    /// PDF document
    Pdf,
    /// HTML page
    Html,
    /// Microsoft Word document (.docx)
    Docx,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "md" | "markdown" => Self::Markdown,
            "txt" => Self::Txt,
            "json" => Self::Json,
            "pdf" => Self::Pdf,
            "html" | "htm" => Self::Html,
            "docx" => Self::Docx,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a filename's extension
    pub fn from_filename(filename: &str) -> Self {
        std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Format tag reported to clients
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Txt => "text",
            Self::Json => "json",
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Docx => "docx",
            Self::Unknown => "unknown",
        }
    }
}

/// A document whose text has been extracted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Filename as uploaded
    pub filename: String,
    /// Label chunks refer back to
    pub source_document: String,
    /// Detected format
    pub file_type: FileType,
    /// Extracted plain text
    pub content: String,
    /// Content hash of the raw upload
    pub content_hash: String,
    /// Upload size in bytes
    pub file_size: u64,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document; the source label is the filename
    pub fn new(filename: String, file_type: FileType, content: String, content_hash: String, file_size: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_document: filename.clone(),
            filename,
            file_type,
            content,
            content_hash,
            file_size,
            ingested_at: chrono::Utc::now(),
        }
    }

    /// Metadata attached to each chunk of this document
    pub fn chunk_metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        meta.insert(
            SOURCE_DOCUMENT_KEY.to_string(),
            serde_json::json!(self.source_document),
        );
        meta.insert(FILENAME_KEY.to_string(), serde_json::json!(self.filename));
        meta
    }
}

/// A chunk of text from a document, the unit of retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Deterministic id (see [`chunk_id`])
    pub id: String,
    /// Text content
    pub text: String,
    /// Zero-based position among the chunks of one document
    pub chunk_index: usize,
    /// Caller-supplied metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Embedding vector, filled in before storage
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Create a chunk; the id is derived from source, index and text prefix
    pub fn new(text: String, chunk_index: usize, metadata: Metadata) -> Self {
        let id = chunk_id(&text, source_of(&metadata), chunk_index);
        Self {
            id,
            text,
            chunk_index,
            metadata,
            embedding: Vec::new(),
        }
    }

    /// Originating document label
    pub fn source_document(&self) -> &str {
        source_of(&self.metadata)
    }

    /// Uploaded filename, falling back to the source label
    pub fn filename(&self) -> &str {
        self.metadata
            .get(FILENAME_KEY)
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| self.source_document())
    }

    /// Metadata persisted alongside the vector
    pub fn to_vector_metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        meta.insert(
            SOURCE_DOCUMENT_KEY.to_string(),
            serde_json::json!(self.source_document()),
        );
        meta.insert("chunk_index".to_string(), serde_json::json!(self.chunk_index));
        meta.insert(FILENAME_KEY.to_string(), serde_json::json!(self.filename()));
        meta
    }
}

fn source_of(metadata: &Metadata) -> &str {
    metadata
        .get(SOURCE_DOCUMENT_KEY)
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN_SOURCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_filename("Guide.MD"), FileType::Markdown);
        assert_eq!(FileType::from_filename("ui_guide.txt"), FileType::Txt);
        assert_eq!(FileType::from_filename("api.json"), FileType::Json);
        assert_eq!(FileType::from_filename("checkout.html"), FileType::Html);
        assert_eq!(FileType::from_filename("notes.docx"), FileType::Docx);
        assert_eq!(FileType::from_filename("scan.png"), FileType::Unknown);
        assert_eq!(FileType::from_filename("README"), FileType::Unknown);
        assert!(!FileType::from_extension(".exe").is_supported());
    }

    #[test]
    fn test_chunk_without_source_uses_unknown() {
        let chunk = Chunk::new("hello".to_string(), 0, Metadata::new());
        assert_eq!(chunk.source_document(), UNKNOWN_SOURCE);
        assert_eq!(chunk.filename(), UNKNOWN_SOURCE);
        assert_eq!(chunk.id, chunk_id("hello", UNKNOWN_SOURCE, 0));
    }

    #[test]
    fn test_vector_metadata() {
        let doc = Document::new(
            "product_specs.md".to_string(),
            FileType::Markdown,
            "Discount code SAVE15".to_string(),
            "abc".to_string(),
            20,
        );
        let chunk = Chunk::new("Discount code SAVE15".to_string(), 3, doc.chunk_metadata());
        let meta = chunk.to_vector_metadata();

        assert_eq!(meta["source_document"], "product_specs.md");
        assert_eq!(meta["filename"], "product_specs.md");
        assert_eq!(meta["chunk_index"], 3);
    }
}
