//! Response contract of the mail endpoint.

use serde::Deserialize;
use serde_json::Value;
use sunshade_core::constants::GENERIC_DISPATCH_FAILURE;
use sunshade_core::SubmissionResult;

/// `{ success: bool, data?, error? }` as returned by `POST /api/email`.
#[derive(Debug, Deserialize)]
pub struct EmailEndpointResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl EmailEndpointResponse {
    pub fn into_result(self) -> SubmissionResult {
        if self.success {
            return SubmissionResult::ok();
        }
        let message = self
            .error
            .and_then(error_text)
            .unwrap_or_else(|| GENERIC_DISPATCH_FAILURE.to_string());
        SubmissionResult::failed(message)
    }
}

/// Text of the endpoint's `error` field. Non-empty strings are taken verbatim,
/// whitespace included; provider error objects are reduced to their `message` when they carry one.
fn error_text(error: Value) -> Option<String> {
    match error {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Object(ref map) => match map.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            _ => Some(error.to_string()),
        },
        other => Some(other.to_string()),
    }
}
