//! Response types for the HTTP API

use serde::{Deserialize, Serialize};

use super::document::Metadata;
use super::test_case::TestCase;

/// A chunk matched by similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Chunk text
    pub content: String,
    /// Stored chunk metadata
    pub metadata: Metadata,
    /// Cosine distance to the query, lower is closer
    pub distance: f32,
}

/// A stored chunk without its vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub content: String,
    pub metadata: Metadata,
}

/// Knowledge base statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseStats {
    /// Number of stored chunks
    pub total_chunks: usize,
    /// Number of distinct source documents
    pub unique_sources: usize,
    /// Distinct source documents, sorted
    pub sources: Vec<String>,
}

/// Outcome of one uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub filename: String,
    /// `success` or `error`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks_created: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadResult {
    /// Successful ingestion
    pub fn success(filename: impl Into<String>, chunks_created: usize) -> Self {
        Self {
            filename: filename.into(),
            status: "success".to_string(),
            chunks_created: Some(chunks_created),
            message: None,
        }
    }

    /// Failed ingestion
    pub fn error(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: "error".to_string(),
            chunks_created: None,
            message: Some(message.into()),
        }
    }

    /// Whether the file was ingested
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Response of the document upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub results: Vec<UploadResult>,
}

/// Response of the HTML upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlUploadResponse {
    pub filename: String,
    pub status: String,
    pub chunks_created: usize,
    pub html_stored: bool,
}

/// Knowledge base and uploaded page overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub knowledge_base: KnowledgeBaseStats,
    /// Filenames of uploaded HTML pages
    pub html_files: Vec<String>,
}

/// Response of the build endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildResponse {
    pub status: String,
    pub message: String,
    pub stats: KnowledgeBaseStats,
}

/// Generated test cases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseResponse {
    /// Parsed test cases, empty when parsing failed
    pub test_cases: Vec<TestCase>,
    /// Unprocessed model output
    pub raw_response: String,
    /// Distinct sources of the retrieved context, sorted
    pub sources_used: Vec<String>,
    /// Set when the model output held no parsable JSON array
    pub parse_error: bool,
}

/// Generated Selenium script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptResponse {
    pub status: String,
    pub test_case_id: String,
    pub script: String,
}

/// Generic status message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// Source document listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesResponse {
    pub sources: Vec<String>,
}

/// Search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
}
