use serde_json::Value;

/// Object keys whose string values are taken as code.
const CODE_KEYS: [&str; 6] = ["added", "new_code", "content", "changes", "diff", "code"];

/// Substrings that make any other string count as code.
const CODE_INDICATORS: [&str; 6] = ["def ", "class ", "import ", "=", "if ", "return"];

fn looks_like_code(text: &str) -> bool {
    CODE_INDICATORS
        .iter()
        .any(|indicator| text.contains(indicator))
}

fn collect<'a>(value: &'a Value, parts: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            for key in CODE_KEYS {
                if let Some(Value::String(code)) = map.get(key) {
                    parts.push(code);
                }
            }
            for nested in map.values() {
                collect(nested, parts);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect(item, parts);
            }
        }
        Value::String(text) if looks_like_code(text) => parts.push(text),
        _ => {}
    }
}

/// Flatten an arbitrarily nested diff document into newline-joined code.
pub fn flatten_diff(diff: &Value) -> String {
    let mut parts = Vec::new();
    collect(diff, &mut parts);
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collects_code_keys_and_code_like_strings() {
        let diff = json!({
            "files": [{
                "filename": "app/model.py",
                "changes": [{"added": ["if compound >= 0.05:", "    pass"], "removed": ["x"]}]
            }],
            "note": "plain prose"
        });

        let text = flatten_diff(&diff);
        assert!(text.contains("if compound >= 0.05:"));
        assert!(!text.contains("plain prose"));
        assert!(!text.contains("app/model.py"));
    }

    #[test]
    fn test_string_under_code_key_is_taken_verbatim() {
        let diff = json!({"diff": "renamed variable"});
        assert!(flatten_diff(&diff).contains("renamed variable"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(flatten_diff(&json!({})), "");
    }
}
