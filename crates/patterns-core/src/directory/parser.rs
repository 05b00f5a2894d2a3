//! Validation of directory response bodies.

use crate::error::{DirectoryError, Result};
use crate::models::PatternRecord;
use crate::network::RawResponse;
use serde_json::Value;

/// Parse a completed response into pattern records.
///
/// Any non-2xx status is a structural error carrying that status, whatever the
/// body says.
pub fn parse_response(response: &RawResponse) -> Result<Vec<PatternRecord>> {
    if !response.is_success() {
        let detail = remote_message(&response.body)
            .map(|m| format!(": {}", m))
            .unwrap_or_default();
        return Err(DirectoryError::Structural {
            message: format!("directory answered HTTP {}{}", response.status, detail),
            status_code: Some(response.status),
        });
    }

    parse_patterns(&response.body).map_err(|err| match err {
        DirectoryError::Structural { message, .. } => DirectoryError::Structural {
            message,
            status_code: Some(response.status),
        },
        other => other,
    })
}

/// Parse a body that must be a JSON array of pattern objects.
pub fn parse_patterns(body: &str) -> Result<Vec<PatternRecord>> {
    if body.trim().is_empty() {
        return Err(DirectoryError::structural("response body was empty"));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| DirectoryError::structural(format!("response is not valid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            let message = match remote_message_of(&other) {
                Some(remote) => format!("expected a list of patterns, got an error: {}", remote),
                None => format!("expected a list of patterns, got {}", kind_of(&other)),
            };
            return Err(DirectoryError::structural(message));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(DirectoryError::structural(format!(
                    "pattern {} is {}, not an object",
                    index,
                    kind_of(&item)
                )));
            }
            serde_json::from_value(item).map_err(|e| {
                DirectoryError::structural(format!("pattern {} is malformed: {}", index, e))
            })
        })
        .collect()
}

fn remote_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| remote_message_of(&v))
}

/// `message` of a `{code, message}` error object.
fn remote_message_of(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .map(String::from)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
