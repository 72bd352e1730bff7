//! Core types for the QA agent

pub mod document;
pub mod query;
pub mod response;
pub mod test_case;

pub use document::{
    Chunk, Document, FileType, Metadata, FILENAME_KEY, SOURCE_DOCUMENT_KEY, UNKNOWN_SOURCE,
};
pub use query::{ScriptGenerationRequest, SearchParams, TestCaseRequest};
pub use response::{ChunkRecord, KnowledgeBaseStats, SearchHit, TestCaseResponse, UploadResult};
pub use test_case::TestCase;
