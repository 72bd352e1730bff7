//! Test case and script generation with an LLM

pub mod agent;
pub mod extract;
pub mod ollama;
pub mod prompt;

pub use agent::{QaAgent, TestCaseGeneration};
pub use extract::{extract_code_block, parse_test_cases, TestCaseParseError};
pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
