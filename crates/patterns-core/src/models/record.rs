//! Pattern records as served by the remote directory.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One directory entry in the remote wire format.
///
/// Fields not modelled here are kept in `extra` so hooks can inspect them,
/// but they never reach the external representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    #[serde(deserialize_with = "absint")]
    pub id: u64,
    pub title: RenderedText,
    pub pattern_content: String,
    pub category_slugs: Vec<String>,
    pub meta: PatternMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A `{ "rendered": ... }` wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedText {
    pub rendered: String,
}

/// Pattern metadata block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMeta {
    pub wpop_description: String,
    /// Comma-separated keyword list.
    pub wpop_keywords: String,
    #[serde(default, deserialize_with = "absint")]
    pub wpop_viewport_width: u64,
    #[serde(default)]
    pub wpop_block_types: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Absolute integer from a number or a numeric string; anything else is 0.
fn absint<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .map(i64::unsigned_abs)
            .or_else(|| n.as_u64())
            .or_else(|| n.as_f64().map(|f| f.abs().trunc() as u64))
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(i64::unsigned_abs)
            .unwrap_or(0),
        _ => 0,
    })
}
