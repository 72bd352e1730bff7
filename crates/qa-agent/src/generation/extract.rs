//! Post-processing of raw model output

use crate::types::TestCase;

/// Model output that held no parsable JSON array of test cases
#[derive(Debug, Clone, thiserror::Error)]
#[error("Could not parse test cases from model response: {reason}")]
pub struct TestCaseParseError {
    /// Unmodified model output
    pub raw_response: String,
    pub reason: String,
}

/// Strip a Markdown code fence around generated code
///
/// A ```` ```python ```` fence wins over a bare fence. Without a closing
/// fence, or when the fenced body is empty, the response is returned as is.
pub fn extract_code_block(response: &str) -> String {
    let opening = if response.contains("```python") {
        "```python"
    } else if response.contains("```") {
        "```"
    } else {
        return response.to_string();
    };

    let Some(open) = response.find(opening) else {
        return response.to_string();
    };
    let start = open + opening.len();

    match response[start..].find("```") {
        Some(len) if len > 0 => response[start..start + len].trim().to_string(),
        _ => response.to_string(),
    }
}

/// Parse the JSON array spanning the first `[` to the last `]`
pub fn parse_test_cases(response: &str) -> Result<Vec<TestCase>, TestCaseParseError> {
    let fail = |reason: String| TestCaseParseError {
        raw_response: response.to_string(),
        reason,
    };

    let (Some(start), Some(end)) = (response.find('['), response.rfind(']')) else {
        return Err(fail("no JSON array found".to_string()));
    };
    if end < start {
        return Err(fail("no JSON array found".to_string()));
    }

    serde_json::from_str(&response[start..=end]).map_err(|e| fail(e.to_string()))
}
