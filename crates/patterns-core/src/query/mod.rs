//! Inbound query handling.
//!
//! - [`schema`] - the declared parameter table
//! - [`types`] - validated values and the normalized query
//! - `validate` - raw parameters to [`NormalizedQuery`]

pub mod schema;
mod types;
mod validate;

pub use schema::{find_param, ParamDefault, ParamKind, ParamSpec, PATTERN_QUERY_SCHEMA};
pub use types::{Context, NormalizedQuery, Order, OrderBy, ParamValue, QueryParams, RawParams};
pub use validate::{validate, validate_params};
