//! Generated test case records

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A test case as produced by the model
///
/// Every field is optional and kept as raw JSON: models drift from the
/// requested format (numeric ids, lists where a sentence was asked for), and a
/// partially conforming record is still worth returning. Fields outside the
/// known set are kept in `extra` and survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Identifier such as `TC-001`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<Value>,
    /// Feature under test
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<Value>,
    /// What is being tested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_scenario: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preconditions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_steps: Option<Value>,
    /// Input values, usually an object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<Value>,
    /// `positive` or `negative`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<Value>,
    /// `high`, `medium` or `low`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Value>,
    /// Source document the case is based on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounded_in: Option<Value>,
    /// Unrecognised fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl TestCase {
    /// Identifier reported with generated scripts
    pub fn id_or_unknown(&self) -> String {
        text_of(self.test_id.as_ref()).unwrap_or_else(|| "unknown".to_string())
    }

    /// Feature name, empty when missing
    pub fn feature_or_empty(&self) -> String {
        text_of(self.feature.as_ref()).unwrap_or_default()
    }

    /// Steps as lines; a single string counts as one step
    pub fn steps(&self) -> Vec<String> {
        lines_of(self.test_steps.as_ref())
    }

    /// Preconditions as lines; a single string counts as one precondition
    pub fn preconditions(&self) -> Vec<String> {
        lines_of(self.preconditions.as_ref())
    }
}

/// Strings verbatim, other values as compact JSON, null as missing
fn text_of(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn lines_of(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|item| text_of(Some(item))).collect(),
        other => text_of(other).into_iter().collect(),
    }
}
