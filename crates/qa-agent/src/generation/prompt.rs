//! Prompt templates for test case and script generation

use crate::types::{SearchHit, TestCase, SOURCE_DOCUMENT_KEY, UNKNOWN_SOURCE};

/// Separator between context blocks in test case prompts
pub const TEST_CASE_CONTEXT_SEPARATOR: &str = "\n\n---\n\n";
/// Separator between context blocks in script prompts
pub const SCRIPT_CONTEXT_SEPARATOR: &str = "\n\n";

const TEST_CASE_SYSTEM_PROMPT: &str = r#"You are an expert QA engineer specializing in test case generation.
Your task is to generate comprehensive test cases based STRICTLY on the provided documentation.

IMPORTANT RULES:
1. ONLY generate test cases for features explicitly mentioned in the documentation
2. NEVER invent or hallucinate features not in the documents
3. Each test case MUST reference the source document it's grounded in
4. Generate both positive and negative test cases
5. Be thorough but only test what's documented

Output format - Return a JSON array of test cases:
[
  {
    "test_id": "TC-001",
    "feature": "Feature Name",
    "test_scenario": "Description of what is being tested",
    "preconditions": ["List of preconditions"],
    "test_steps": ["Step 1", "Step 2", ...],
    "test_data": {"key": "value"},
    "expected_result": "Expected outcome",
    "test_type": "positive|negative",
    "priority": "high|medium|low",
    "grounded_in": "source_document.ext"
  }
]"#;

const SELENIUM_SYSTEM_PROMPT: &str = r#"You are an expert Selenium automation engineer.
Your task is to generate clean, executable Python Selenium scripts.

REQUIREMENTS:
1. Use appropriate selectors (prefer IDs, then names, then CSS selectors)
2. Include proper waits (explicit waits preferred)
3. Add clear comments explaining each step
4. Include assertions to verify expected results
5. Handle potential errors gracefully
6. Make the script self-contained and runnable
7. Use the actual HTML structure provided - match selectors EXACTLY

Output ONLY the Python code, no explanations before or after."#;

/// Prompt builder for generation requests
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render retrieved chunks as `[Source: name]` blocks joined by `separator`
    pub fn build_context(hits: &[SearchHit], separator: &str) -> String {
        hits.iter()
            .map(|hit| {
                let source = hit
                    .metadata
                    .get(SOURCE_DOCUMENT_KEY)
                    .and_then(|v| v.as_str())
                    .unwrap_or(UNKNOWN_SOURCE);
                format!("[Source: {}]\n{}", source, hit.content)
            })
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn test_case_system_prompt() -> &'static str {
        TEST_CASE_SYSTEM_PROMPT
    }

    /// User prompt asking for test cases grounded in `context`
    pub fn build_test_case_prompt(query: &str, context: &str) -> String {
        format!(
            r#"Based on the following documentation, generate test cases for this request:

USER REQUEST: {query}

DOCUMENTATION CONTEXT:
{context}

Generate comprehensive test cases in the specified JSON format. Only include test cases that are directly supported by the provided documentation."#
        )
    }

    pub fn selenium_system_prompt() -> &'static str {
        SELENIUM_SYSTEM_PROMPT
    }

    /// User prompt asking for a Selenium script automating `test_case` against `html`
    pub fn build_selenium_prompt(test_case: &TestCase, html: &str, context: &str) -> String {
        // TestCase serialization cannot fail: string keys, no non-finite floats
        let test_case_json = serde_json::to_string_pretty(test_case).unwrap_or_default();

        format!(
            r#"Generate a Selenium Python script for this test case:

TEST CASE:
{test_case_json}

HTML STRUCTURE (use these exact selectors):
{html}

ADDITIONAL CONTEXT:
{context}

Generate a complete, runnable Selenium Python script that:
1. Sets up the WebDriver
2. Navigates to the page
3. Executes the test steps
4. Verifies the expected result
5. Cleans up properly"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metadata;

    fn hit(source: Option<&str>, content: &str) -> SearchHit {
        let mut metadata = Metadata::new();
        if let Some(source) = source {
            metadata.insert(SOURCE_DOCUMENT_KEY.to_string(), serde_json::json!(source));
        }
        SearchHit {
            content: content.to_string(),
            metadata,
            distance: 0.1,
        }
    }

    #[test]
    fn test_build_context() {
        let hits = vec![
            hit(Some("product_specs.md"), "SAVE15 gives 15% off."),
            hit(None, "Orphan chunk."),
        ];
        assert_eq!(
            PromptBuilder::build_context(&hits, TEST_CASE_CONTEXT_SEPARATOR),
            "[Source: product_specs.md]\nSAVE15 gives 15% off.\n\n---\n\n[Source: unknown]\nOrphan chunk."
        );
        assert_eq!(PromptBuilder::build_context(&[], SCRIPT_CONTEXT_SEPARATOR), "");
    }

    #[test]
    fn test_test_case_prompt_sections() {
        let prompt = PromptBuilder::build_test_case_prompt("discount code", "[Source: a.md]\nx");
        assert!(prompt.contains("USER REQUEST: discount code"));
        assert!(prompt.contains("DOCUMENTATION CONTEXT:\n[Source: a.md]\nx"));
        assert!(PromptBuilder::test_case_system_prompt().contains("\"grounded_in\""));
    }

    #[test]
    fn test_selenium_prompt_embeds_test_case() {
        let case = TestCase {
            test_id: Some(serde_json::json!("TC-001")),
            feature: Some(serde_json::json!("Discount Code")),
            ..Default::default()
        };
        let prompt = PromptBuilder::build_selenium_prompt(&case, "<button id=\"pay\">", "ctx");
        assert!(prompt.contains("  \"test_id\": \"TC-001\""));
        assert!(prompt.contains("HTML STRUCTURE (use these exact selectors):\n<button id=\"pay\">"));
        assert!(prompt.contains("ADDITIONAL CONTEXT:\nctx"));
        assert!(PromptBuilder::selenium_system_prompt().ends_with("no explanations before or after."));
    }
}
