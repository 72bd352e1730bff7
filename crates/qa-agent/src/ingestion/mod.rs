//! Document ingestion: format extraction, chunking and chunk identity

mod chunker;
mod html;
pub mod identity;
mod parser;
mod processor;

pub use chunker::TextChunker;
pub use html::summarize_html;
pub use identity::chunk_id;
pub use parser::{decode_text, DocumentProcessor, Extractor};
pub use processor::IngestPipeline;
