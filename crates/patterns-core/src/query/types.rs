//! Query value types shared by the validator, key codec and fetcher.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw, unvalidated parameters as received from the caller.
pub type RawParams = serde_json::Map<String, serde_json::Value>;

/// A single validated parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Text(String),
    List(Vec<String>),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Render the value the way it appears in a query string.
    pub fn to_query_value(&self) -> String {
        match self {
            ParamValue::Int(v) => v.to_string(),
            ParamValue::Text(v) => v.clone(),
            ParamValue::List(v) => v.join(","),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        ParamValue::List(v)
    }
}

/// Parameter name to value mapping.
///
/// Backed by a `BTreeMap`, so iteration order is the key order no matter how
/// the map was built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, ParamValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Order::Asc),
            "desc" => Some(Order::Desc),
            _ => None,
        }
    }
}

/// Sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    Date,
    Title,
    FavoriteCount,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Date => "date",
            OrderBy::Title => "title",
            OrderBy::FavoriteCount => "favorite_count",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "date" => Some(OrderBy::Date),
            "title" => Some(OrderBy::Title),
            "favorite_count" => Some(OrderBy::FavoriteCount),
            _ => None,
        }
    }
}

/// Scope under which the listing is requested. Passed to pipeline hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    #[default]
    View,
    Embed,
    Edit,
}

impl Context {
    pub fn as_str(&self) -> &'static str {
        match self {
            Context::View => "view",
            Context::Embed => "embed",
            Context::Edit => "edit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Context::View),
            "embed" => Some(Context::Embed),
            "edit" => Some(Context::Edit),
            _ => None,
        }
    }
}

/// A fully validated pattern query with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQuery {
    pub per_page: u32,
    pub page: u32,
    pub offset: Option<u32>,
    pub order: Order,
    pub orderby: OrderBy,
    pub category: Option<i64>,
    pub keyword: Option<i64>,
    pub search: Option<String>,
    pub slug: Vec<String>,
    pub context: Context,
}

impl Default for NormalizedQuery {
    fn default() -> Self {
        Self {
            per_page: 100,
            page: 1,
            offset: None,
            order: Order::default(),
            orderby: OrderBy::default(),
            category: None,
            keyword: None,
            search: None,
            slug: Vec::new(),
            context: Context::default(),
        }
    }
}

impl NormalizedQuery {
    /// Parameters that select which patterns the directory returns.
    ///
    /// `context` only shapes the local representation and is left out.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("per_page", self.per_page);
        params.insert("page", self.page);
        params.insert("order", self.order.as_str());
        params.insert("orderby", self.orderby.as_str());
        if let Some(offset) = self.offset {
            params.insert("offset", offset);
        }
        if let Some(category) = self.category {
            params.insert("category", category);
        }
        if let Some(keyword) = self.keyword {
            params.insert("keyword", keyword);
        }
        if let Some(ref search) = self.search {
            params.insert("search", search.as_str());
        }
        if !self.slug.is_empty() {
            params.insert("slug", self.slug.clone());
        }
        params
    }
}
