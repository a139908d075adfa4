use serde::Serialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCheck {
    pub key: String,
    pub valid: bool,
}

impl KeyCheck {
    pub fn message(&self) -> String {
        if self.valid {
            format!("Key '{}' is valid.", self.key)
        } else {
            format!("Warning: Missing or empty key - {}", self.key)
        }
    }
}

/// Checks that each expected key is present with a non-empty value. An
/// absent document fails every key. Never blocks the pipeline.
pub fn validate_document(document: Option<&Value>, expected_keys: &[&str]) -> Vec<KeyCheck> {
    expected_keys
        .iter()
        .map(|key| {
            let valid = document
                .and_then(|doc| doc.get(*key))
                .is_some_and(|value| !is_blank(value));
            if !valid {
                warn!(key, "missing or empty key");
            }
            KeyCheck {
                key: key.to_string(),
                valid,
            }
        })
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn present_non_empty_key_is_valid() {
        let doc = json!({"quiz_history": [{"topic": "Physics"}]});
        let checks = validate_document(Some(&doc), &["quiz_history"]);
        assert_eq!(checks.len(), 1);
        assert!(checks[0].valid);
        assert_eq!(checks[0].message(), "Key 'quiz_history' is valid.");
    }

    #[test]
    fn empty_or_missing_keys_warn() {
        let doc = json!({"quiz_history": [], "other": 1});
        let checks = validate_document(Some(&doc), &["quiz_history", "quiz_submissions"]);
        assert!(checks.iter().all(|check| !check.valid));
        assert_eq!(
            checks[1].message(),
            "Warning: Missing or empty key - quiz_submissions"
        );
    }

    #[test]
    fn absent_document_fails_every_key() {
        let checks = validate_document(None, &["quiz_submissions"]);
        assert!(!checks[0].valid);
    }

    #[test]
    fn blank_scalars_count_as_empty() {
        let doc = json!({"a": null, "b": "", "c": 0, "d": {}, "e": "x"});
        let checks = validate_document(Some(&doc), &["a", "b", "c", "d", "e"]);
        let valid: Vec<bool> = checks.iter().map(|check| check.valid).collect();
        assert_eq!(valid, vec![false, false, false, false, true]);
    }
}
