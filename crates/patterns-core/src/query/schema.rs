//! Declared parameter schema for the pattern listing.

/// Kind of value a parameter accepts, with its validity bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Whole number, optionally bounded (both ends inclusive).
    Integer { min: Option<i64>, max: Option<i64> },
    /// One string out of a fixed set.
    Enum(&'static [&'static str]),
    /// Free text.
    Text,
    /// List of strings; an empty list is the same as no list.
    List,
}

/// Default filled in when a parameter is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Int(i64),
    Str(&'static str),
}

/// One recognized parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: Option<ParamDefault>,
}

pub const ORDER_VALUES: &[&str] = &["asc", "desc"];
pub const ORDERBY_VALUES: &[&str] = &["date", "title", "favorite_count"];
pub const CONTEXT_VALUES: &[&str] = &["view", "embed", "edit"];

/// Parameters accepted by the pattern listing.
pub const PATTERN_QUERY_SCHEMA: &[ParamSpec] = &[
    ParamSpec {
        name: "context",
        kind: ParamKind::Enum(CONTEXT_VALUES),
        default: Some(ParamDefault::Str("view")),
    },
    ParamSpec {
        name: "page",
        kind: ParamKind::Integer { min: Some(1), max: None },
        default: Some(ParamDefault::Int(1)),
    },
    ParamSpec {
        name: "per_page",
        kind: ParamKind::Integer { min: Some(1), max: Some(100) },
        default: Some(ParamDefault::Int(100)),
    },
    ParamSpec {
        name: "search",
        kind: ParamKind::Text,
        default: None,
    },
    ParamSpec {
        name: "category",
        kind: ParamKind::Integer { min: None, max: None },
        default: None,
    },
    ParamSpec {
        name: "keyword",
        kind: ParamKind::Integer { min: None, max: None },
        default: None,
    },
    ParamSpec {
        name: "slug",
        kind: ParamKind::List,
        default: None,
    },
    ParamSpec {
        name: "offset",
        kind: ParamKind::Integer { min: Some(0), max: None },
        default: None,
    },
    ParamSpec {
        name: "order",
        kind: ParamKind::Enum(ORDER_VALUES),
        default: Some(ParamDefault::Str("desc")),
    },
    ParamSpec {
        name: "orderby",
        kind: ParamKind::Enum(ORDERBY_VALUES),
        default: Some(ParamDefault::Str("date")),
    },
];

/// Look up a parameter by name.
pub fn find_param(name: &str) -> Option<&'static ParamSpec> {
    PATTERN_QUERY_SCHEMA.iter().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_names_are_unique() {
        let mut names: Vec<&str> = PATTERN_QUERY_SCHEMA.iter().map(|s| s.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), PATTERN_QUERY_SCHEMA.len());
    }

    #[test]
    fn test_per_page_bounds() {
        let spec = find_param("per_page").unwrap();
        assert_eq!(
            spec.kind,
            ParamKind::Integer {
                min: Some(1),
                max: Some(100)
            }
        );
        assert_eq!(spec.default, Some(ParamDefault::Int(100)));
    }
}
