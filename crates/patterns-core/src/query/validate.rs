//! Validation and normalization of inbound query parameters.

use super::schema::{ParamDefault, ParamKind, ParamSpec, PATTERN_QUERY_SCHEMA};
use super::types::{Context, NormalizedQuery, Order, OrderBy, ParamValue, QueryParams, RawParams};
use crate::error::{DirectoryError, Result};
use serde_json::Value;
use tracing::debug;

/// Validate raw parameters against a schema.
///
/// Absent parameters take their declared default (or stay absent when they
/// have none). Parameters the schema does not know are ignored. Every
/// offending parameter is reported, in schema order.
pub fn validate_params(raw: &RawParams, schema: &[ParamSpec]) -> Result<QueryParams> {
    let mut params = QueryParams::new();
    let mut invalid: Vec<(&'static str, String)> = Vec::new();

    for spec in schema {
        match raw.get(spec.name) {
            None | Some(Value::Null) => {
                if let Some(default) = spec.default {
                    params.insert(spec.name, default_value(default));
                }
            }
            Some(value) => match coerce(spec, value) {
                Ok(Some(v)) => params.insert(spec.name, v),
                Ok(None) => {}
                Err(message) => invalid.push((spec.name, message)),
            },
        }
    }

    if invalid.is_empty() {
        return Ok(params);
    }

    let names: Vec<&str> = invalid.iter().map(|(name, _)| *name).collect();
    let messages: Vec<String> = invalid.into_iter().map(|(_, message)| message).collect();
    debug!("Rejected query parameters: {:?}", names);

    Err(DirectoryError::Validation {
        param: names.join(", "),
        message: messages.join("; "),
    })
}

/// Validate raw parameters against [`PATTERN_QUERY_SCHEMA`].
pub fn validate(raw: &RawParams) -> Result<NormalizedQuery> {
    let params = validate_params(raw, PATTERN_QUERY_SCHEMA)?;
    NormalizedQuery::try_from(&params)
}

impl TryFrom<&QueryParams> for NormalizedQuery {
    type Error = DirectoryError;

    fn try_from(params: &QueryParams) -> Result<Self> {
        let defaults = NormalizedQuery::default();

        let per_page = match params.get("per_page") {
            Some(v) => to_u32("per_page", v)?,
            None => defaults.per_page,
        };
        let page = match params.get("page") {
            Some(v) => to_u32("page", v)?,
            None => defaults.page,
        };
        let offset = params
            .get("offset")
            .map(|v| to_u32("offset", v))
            .transpose()?;
        let order = match params.get("order") {
            Some(v) => v
                .as_text()
                .and_then(Order::parse)
                .ok_or_else(|| not_one_of("order", super::schema::ORDER_VALUES))?,
            None => defaults.order,
        };
        let orderby = match params.get("orderby") {
            Some(v) => v
                .as_text()
                .and_then(OrderBy::parse)
                .ok_or_else(|| not_one_of("orderby", super::schema::ORDERBY_VALUES))?,
            None => defaults.orderby,
        };
        let context = match params.get("context") {
            Some(v) => v
                .as_text()
                .and_then(Context::parse)
                .ok_or_else(|| not_one_of("context", super::schema::CONTEXT_VALUES))?,
            None => defaults.context,
        };

        Ok(NormalizedQuery {
            per_page,
            page,
            offset,
            order,
            orderby,
            category: params.get("category").and_then(ParamValue::as_int),
            keyword: params.get("keyword").and_then(ParamValue::as_int),
            search: params
                .get("search")
                .and_then(ParamValue::as_text)
                .map(String::from),
            slug: params
                .get("slug")
                .and_then(ParamValue::as_list)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            context,
        })
    }
}

fn default_value(default: ParamDefault) -> ParamValue {
    match default {
        ParamDefault::Int(v) => ParamValue::Int(v),
        ParamDefault::Str(v) => ParamValue::Text(v.to_string()),
    }
}

/// Coerce one raw value. `Ok(None)` means the value is present but
/// equivalent to absence (an empty list).
fn coerce(spec: &ParamSpec, value: &Value) -> std::result::Result<Option<ParamValue>, String> {
    let name = spec.name;
    match spec.kind {
        ParamKind::Integer { min, max } => {
            let v = as_integer(value).ok_or_else(|| format!("{} is not of type integer.", name))?;
            check_range(name, v, min, max)?;
            Ok(Some(ParamValue::Int(v)))
        }
        ParamKind::Enum(allowed) => match value {
            Value::String(s) if allowed.contains(&s.as_str()) => {
                Ok(Some(ParamValue::Text(s.clone())))
            }
            _ => Err(format!("{} is not one of {}.", name, allowed.join(", "))),
        },
        ParamKind::Text => match value {
            Value::String(s) => Ok(Some(ParamValue::Text(s.clone()))),
            Value::Number(n) => Ok(Some(ParamValue::Text(n.to_string()))),
            _ => Err(format!("{} is not of type string.", name)),
        },
        ParamKind::List => {
            let items = as_list(value).ok_or_else(|| format!("{} is not of type array.", name))?;
            if items.is_empty() {
                Ok(None)
            } else {
                Ok(Some(ParamValue::List(items)))
            }
        }
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral_f64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Whole-number floats inside the `i64` range. `i64::MAX as f64` rounds up
/// to 2^63, so the upper bound is exclusive.
fn integral_f64(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn as_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = match value {
        Value::Array(values) => {
            let mut items = Vec::with_capacity(values.len());
            for v in values {
                match v {
                    Value::String(s) => items.push(s.trim().to_string()),
                    Value::Number(n) => items.push(n.to_string()),
                    _ => return None,
                }
            }
            items
        }
        Value::String(s) => s
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::to_string)
            .collect(),
        Value::Number(n) => vec![n.to_string()],
        _ => return None,
    };

    Some(items.into_iter().filter(|s| !s.is_empty()).collect())
}

fn check_range(
    name: &str,
    v: i64,
    min: Option<i64>,
    max: Option<i64>,
) -> std::result::Result<(), String> {
    match (min, max) {
        (Some(lo), Some(hi)) if v < lo || v > hi => Err(format!(
            "{} must be between {} (inclusive) and {} (inclusive)",
            name, lo, hi
        )),
        (Some(lo), None) if v < lo => {
            Err(format!("{} must be greater than or equal to {}", name, lo))
        }
        (None, Some(hi)) if v > hi => Err(format!("{} must be less than or equal to {}", name, hi)),
        _ => Ok(()),
    }
}

fn to_u32(name: &str, value: &ParamValue) -> Result<u32> {
    value
        .as_int()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| DirectoryError::invalid_param(name, format!("{} is out of range.", name)))
}

fn not_one_of(name: &str, allowed: &[&str]) -> DirectoryError {
    DirectoryError::invalid_param(name, format!("{} is not one of {}.", name, allowed.join(", ")))
}
