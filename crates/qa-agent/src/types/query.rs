//! Request types

use serde::{Deserialize, Serialize};

use super::test_case::TestCase;

/// Test case generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseRequest {
    /// Free-text description of what to test
    pub query: String,

    /// Number of chunks to retrieve as context (default: 10)
    #[serde(default = "default_n_context")]
    pub n_context: usize,
}

fn default_n_context() -> usize {
    10
}

/// Selenium script generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptGenerationRequest {
    /// Test case to automate
    pub test_case: TestCase,

    /// Uploaded page the script targets (default: checkout.html)
    #[serde(default = "default_html_filename")]
    pub html_filename: String,
}

fn default_html_filename() -> String {
    "checkout.html".to_string()
}

/// Query string of the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,

    /// Number of results (default: 5)
    #[serde(default = "default_n_results")]
    pub n_results: usize,
}

fn default_n_results() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: TestCaseRequest = serde_json::from_str(r#"{"query": "discount codes"}"#).unwrap();
        assert_eq!(req.n_context, 10);

        let req: ScriptGenerationRequest =
            serde_json::from_str(r#"{"test_case": {"test_id": "TC-002"}}"#).unwrap();
        assert_eq!(req.html_filename, "checkout.html");
        assert_eq!(req.test_case.id_or_unknown(), "TC-002");
    }
}
