use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    /// First flat `{...}` object containing at least one quoted string
    static ref EMBEDDED_OBJECT: Regex = Regex::new(r#"\{[^{}]*"[^{}]*"[^{}]*\}"#).unwrap();
}

pub const INVALID_RESPONSE: &str = r#"{"error": "invalid_response"}"#;

/// Reduce raw model output to a JSON object string.
///
/// Valid JSON passes through untouched; otherwise the first embedded object
/// is extracted, falling back to [`INVALID_RESPONSE`].
pub fn clean_llm_response(text: &str) -> String {
    if serde_json::from_str::<Value>(text).is_ok() {
        return text.to_string();
    }

    EMBEDDED_OBJECT
        .find(text)
        .map(|found| found.as_str().to_string())
        .unwrap_or_else(|| INVALID_RESPONSE.to_string())
}

/// Verdict object in the shape the gateway promises: `{"<bug>": "true"}`.
pub fn verdict_json(bug_key: &str, fixed: bool) -> String {
    serde_json::json!({ bug_key: fixed.to_string() }).to_string()
}

/// Whether a gateway response says `bug_key` is fixed.
///
/// Accepts `"true"` in any case or a JSON boolean. Anything else, including
/// unparseable text, is a rejection.
pub fn is_fixed(response: &str, bug_key: &str) -> bool {
    let parsed = serde_json::from_str::<Value>(response)
        .or_else(|_| serde_json::from_str::<Value>(&clean_llm_response(response)));

    let Ok(Value::Object(map)) = parsed else {
        return false;
    };

    match map.get(bug_key) {
        Some(Value::String(verdict)) => verdict.trim().eq_ignore_ascii_case("true"),
        Some(Value::Bool(verdict)) => *verdict,
        _ => false,
    }
}
