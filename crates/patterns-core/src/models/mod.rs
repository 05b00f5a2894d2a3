//! Pattern data types.

mod pattern;
mod record;
mod sanitize;

pub use pattern::{prepare_pattern, PATTERN_FIELDS};
pub use record::{PatternMeta, PatternRecord, RenderedText};
pub use sanitize::{sanitize_slug, sanitize_text, split_keywords};
