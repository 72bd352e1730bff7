//! Retrieval-grounded test case and Selenium script generation

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::LlmProvider;
use crate::retrieval::KnowledgeBase;
use crate::types::{SearchHit, TestCase, TestCaseResponse, SOURCE_DOCUMENT_KEY, UNKNOWN_SOURCE};

use super::extract::{extract_code_block, parse_test_cases, TestCaseParseError};
use super::prompt::{PromptBuilder, SCRIPT_CONTEXT_SEPARATOR, TEST_CASE_CONTEXT_SEPARATOR};

/// Context chunks retrieved for script generation
pub const SCRIPT_CONTEXT_RESULTS: usize = 5;

/// Outcome of a test case generation request
#[derive(Debug, Clone)]
pub struct TestCaseGeneration {
    /// Unmodified model output
    pub raw_response: String,
    /// Parsed test cases, empty when parsing failed
    pub test_cases: Vec<TestCase>,
    /// Why the output could not be parsed
    pub parse_error: Option<TestCaseParseError>,
    /// Distinct sources of the retrieved context, sorted
    pub sources_used: Vec<String>,
}

impl From<TestCaseGeneration> for TestCaseResponse {
    fn from(generation: TestCaseGeneration) -> Self {
        Self {
            test_cases: generation.test_cases,
            raw_response: generation.raw_response,
            sources_used: generation.sources_used,
            parse_error: generation.parse_error.is_some(),
        }
    }
}

/// QA agent combining retrieval with an LLM
#[derive(Clone)]
pub struct QaAgent {
    knowledge_base: KnowledgeBase,
    llm: Arc<dyn LlmProvider>,
}

impl QaAgent {
    pub fn new(knowledge_base: KnowledgeBase, llm: Arc<dyn LlmProvider>) -> Self {
        Self { knowledge_base, llm }
    }

    /// Generate test cases for `query` from the `n_context` closest chunks
    pub async fn generate_test_cases(&self, query: &str, n_context: usize) -> Result<TestCaseGeneration> {
        if self.knowledge_base.is_empty().await? {
            return Err(Error::EmptyKnowledgeBase);
        }

        let hits = self.knowledge_base.search(query, n_context).await?;
        let context = PromptBuilder::build_context(&hits, TEST_CASE_CONTEXT_SEPARATOR);
        let prompt = PromptBuilder::build_test_case_prompt(query, &context);

        tracing::info!(
            "Generating test cases for '{}' with {} context chunks ({})",
            query,
            hits.len(),
            self.llm.name()
        );
        let raw_response = self
            .llm
            .generate(&prompt, Some(PromptBuilder::test_case_system_prompt()))
            .await?;
        tracing::debug!("LLM response received, {} characters", raw_response.chars().count());

        let (test_cases, parse_error) = match parse_test_cases(&raw_response) {
            Ok(cases) => (cases, None),
            Err(e) => {
                tracing::warn!("{}", e);
                (Vec::new(), Some(e))
            }
        };

        Ok(TestCaseGeneration {
            raw_response,
            test_cases,
            parse_error,
            sources_used: sources_of(&hits),
        })
    }

    /// Generate a Selenium script automating `test_case` against the page `html`
    pub async fn generate_selenium_script(&self, test_case: &TestCase, html: &str) -> Result<String> {
        let hits = self
            .knowledge_base
            .search(&test_case.feature_or_empty(), SCRIPT_CONTEXT_RESULTS)
            .await?;
        let context = PromptBuilder::build_context(&hits, SCRIPT_CONTEXT_SEPARATOR);
        let prompt = PromptBuilder::build_selenium_prompt(test_case, html, &context);

        tracing::info!("Generating Selenium script for {}", test_case.id_or_unknown());
        let response = self
            .llm
            .generate(&prompt, Some(PromptBuilder::selenium_system_prompt()))
            .await?;

        Ok(extract_code_block(&response))
    }
}

fn sources_of(hits: &[SearchHit]) -> Vec<String> {
    hits.iter()
        .map(|hit| {
            hit.metadata
                .get(SOURCE_DOCUMENT_KEY)
                .and_then(|v| v.as_str())
                .unwrap_or(UNKNOWN_SOURCE)
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
