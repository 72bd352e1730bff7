//! Vector storage and semantic retrieval

mod knowledge_base;
mod store;

pub use knowledge_base::KnowledgeBase;
pub use store::{cosine_similarity, VectorStore};
