//! External representation of a pattern.

use super::record::PatternRecord;
use super::sanitize::{sanitize_slug, sanitize_text, split_keywords};
use serde_json::{Map, Value};

/// Keys of the external pattern object, in output order. Nothing else is
/// ever copied from a remote record.
pub const PATTERN_FIELDS: [&str; 8] = [
    "id",
    "title",
    "content",
    "categories",
    "keywords",
    "description",
    "viewport_width",
    "block_types",
];

/// Project a remote record onto [`PATTERN_FIELDS`].
pub fn prepare_pattern(record: &PatternRecord) -> Map<String, Value> {
    let mut prepared = Map::new();
    for field in PATTERN_FIELDS {
        if let Some(value) = field_value(record, field) {
            prepared.insert(field.to_string(), value);
        }
    }
    prepared
}

fn field_value(record: &PatternRecord, field: &str) -> Option<Value> {
    let value = match field {
        "id" => Value::from(record.id),
        "title" => Value::from(sanitize_text(&record.title.rendered)),
        "content" => Value::from(record.pattern_content.clone()),
        "categories" => Value::from(
            record
                .category_slugs
                .iter()
                .map(|s| sanitize_slug(s))
                .collect::<Vec<_>>(),
        ),
        "keywords" => Value::from(split_keywords(&record.meta.wpop_keywords)),
        "description" => Value::from(sanitize_text(&record.meta.wpop_description)),
        "viewport_width" => Value::from(record.meta.wpop_viewport_width),
        "block_types" => Value::from(
            record
                .meta
                .wpop_block_types
                .iter()
                .map(|s| sanitize_text(s))
                .collect::<Vec<_>>(),
        ),
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with_extra() -> PatternRecord {
        serde_json::from_value(json!({
            "id": 19,
            "title": { "rendered": "Large header with a heading" },
            "pattern_content": "<!-- wp:cover -->\n<div class=\"wp-block-cover\"></div>\n<!-- /wp:cover -->",
            "category_slugs": ["header"],
            "meta": {
                "wpop_description": "A large hero section.",
                "wpop_keywords": "header, hero",
                "wpop_viewport_width": 1280,
                "wpop_block_types": ["core/cover"],
                "wpop_locale": "en_US"
            },
            "extra_field": "this should be removed",
            "favorite_count": 3
        }))
        .unwrap()
    }

    #[test]
    fn test_prepared_keys_match_schema() {
        let prepared = prepare_pattern(&record_with_extra());
        let keys: Vec<&str> = prepared.keys().map(String::as_str).collect();

        let mut expected = PATTERN_FIELDS.to_vec();
        let mut actual = keys.clone();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
        assert!(!prepared.contains_key("extra_field"));
        assert!(!prepared.contains_key("favorite_count"));
    }

    #[test]
    fn test_prepared_values() {
        let prepared = prepare_pattern(&record_with_extra());
        assert_eq!(prepared["id"], json!(19));
        assert_eq!(prepared["title"], json!("Large header with a heading"));
        assert_eq!(prepared["categories"], json!(["header"]));
        assert_eq!(prepared["keywords"], json!(["header", "hero"]));
        assert_eq!(prepared["viewport_width"], json!(1280));
        assert_eq!(prepared["block_types"], json!(["core/cover"]));
        assert!(prepared["content"]
            .as_str()
            .unwrap()
            .starts_with("<!-- wp:cover -->"));
    }
}
