//! qa-agent: document-grounded test case and Selenium script generation
//!
//! Support documents (Markdown, text, JSON, PDF, HTML, DOCX) are extracted,
//! split into paragraph- and sentence-aware chunks with deterministic ids,
//! embedded and stored in a local vector collection. Test case and Selenium
//! script requests retrieve the closest chunks and prompt an LLM (Groq or
//! Ollama) with them.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::QaConfig;
pub use error::{Error, Result};
pub use generation::QaAgent;
pub use ingestion::{chunk_id, IngestPipeline, TextChunker};
pub use types::{
    document::{Chunk, Document, FileType, Metadata},
    test_case::TestCase,
};
