//! Text cleanup applied to remote fields before they are exposed.

use regex::Regex;
use std::sync::LazyLock;

/// Markup tags, including unterminated trailing ones.
static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>?").expect("sanitize regex must compile"));

/// Runs of whitespace.
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("sanitize regex must compile"));

/// Characters not allowed in a slug.
static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_\-]").expect("sanitize regex must compile"));

static REPEATED_DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("sanitize regex must compile"));

/// Plain single-line text: tags stripped, whitespace collapsed, trimmed.
///
/// ```
/// use patterns_core::models::sanitize_text;
///
/// assert_eq!(sanitize_text("  <b>Hero</b>\n section "), "Hero section");
/// ```
pub fn sanitize_text(input: &str) -> String {
    let stripped = TAGS.replace_all(input, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Lowercase slug made of `[a-z0-9_-]`.
///
/// ```
/// use patterns_core::models::sanitize_slug;
///
/// assert_eq!(sanitize_slug("Call To Action"), "call-to-action");
/// ```
pub fn sanitize_slug(input: &str) -> String {
    let stripped = TAGS.replace_all(input, "").to_lowercase();
    let dashed = WHITESPACE.replace_all(stripped.trim(), "-");
    let cleaned = NON_SLUG.replace_all(&dashed, "");
    REPEATED_DASHES
        .replace_all(&cleaned, "-")
        .trim_matches('-')
        .to_string()
}

/// Split a comma-separated keyword list into cleaned, non-empty keywords.
pub fn split_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(sanitize_text)
        .filter(|k| !k.is_empty())
        .collect()
}
