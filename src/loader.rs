use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::models::{Submission, SubmissionTable};

/// Builds a submission table from the array under `key`. Anything other than
/// an array of objects degrades to an empty table.
pub fn load_table(document: Option<&Value>, key: &str) -> SubmissionTable {
    let items: &[Value] = match document.and_then(|doc| doc.get(key)) {
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            warn!(key, "expected an array of submissions");
            &[]
        }
        None => &[],
    };

    let mut table = SubmissionTable::default();
    for (index, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            warn!(key, index, "skipping non-object submission");
            continue;
        };
        table.columns.extend(fields.keys().cloned());
        table.rows.push(submission_from_fields(fields));
    }

    info!(key, rows = table.len(), "loaded submissions");
    table
}

fn submission_from_fields(fields: &Map<String, Value>) -> Submission {
    Submission {
        topic: fields.get("topic").and_then(label),
        accuracy: fields.get("accuracy").and_then(Value::as_f64),
        difficulty: fields.get("difficulty").and_then(Value::as_f64),
        score: fields.get("score").and_then(Value::as_f64),
        submission_time: fields.get("submission_time").and_then(label),
    }
}

fn label(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
