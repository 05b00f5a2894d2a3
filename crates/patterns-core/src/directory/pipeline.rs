//! Preparation of records for output and the ordered hook chain.

use super::request::RequestMethod;
use crate::models::{prepare_pattern, PatternRecord};
use crate::query::{Context, NormalizedQuery};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// What a hook knows about the request being answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: RequestMethod,
    pub context: Context,
    pub query: NormalizedQuery,
}

impl RequestContext {
    pub fn new(method: RequestMethod, query: NormalizedQuery) -> Self {
        Self {
            method,
            context: query.context,
            query,
        }
    }
}

/// A transformation applied to each prepared pattern.
///
/// Receives the current representation, the record it came from and the
/// request context, and returns the replacement representation. Any JSON value
/// is allowed, including a scalar.
pub trait PatternHook: Send + Sync {
    fn apply(&self, prepared: Value, record: &PatternRecord, ctx: &RequestContext) -> Value;
}

impl<F> PatternHook for F
where
    F: Fn(Value, &PatternRecord, &RequestContext) -> Value + Send + Sync,
{
    fn apply(&self, prepared: Value, record: &PatternRecord, ctx: &RequestContext) -> Value {
        self(prepared, record, ctx)
    }
}

/// Ordered list of hooks run over every prepared record.
#[derive(Clone, Default)]
pub struct Pipeline {
    hooks: Vec<Arc<dyn PatternHook>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a closure hook.
    pub fn hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value, &PatternRecord, &RequestContext) -> Value + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Append a shared hook.
    pub fn add_hook(&mut self, hook: Arc<dyn PatternHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Prepare each record and run the hooks over it in registration order.
    pub fn apply(&self, records: &[PatternRecord], ctx: &RequestContext) -> Vec<Value> {
        records
            .iter()
            .map(|record| {
                let prepared = Value::Object(prepare_pattern(record));
                self.hooks
                    .iter()
                    .fold(prepared, |value, hook| hook.apply(value, record, ctx))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(id: u64) -> PatternRecord {
        serde_json::from_value(json!({
            "id": id,
            "title": { "rendered": format!("Pattern {}", id) },
            "pattern_content": "<!-- wp:paragraph /-->",
            "category_slugs": ["text"],
            "meta": { "wpop_description": "", "wpop_keywords": "text" },
            "favorite_count": 1
        }))
        .unwrap()
    }

    fn ctx() -> RequestContext {
        RequestContext::new(RequestMethod::Get, NormalizedQuery::default())
    }

    #[test]
    fn test_no_hooks_prepares_only() {
        let out = Pipeline::new().apply(&[record(1), record(2)], &ctx());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["id"], json!(1));
        assert!(out[0].get("favorite_count").is_none());
    }

    #[test]
    fn test_hooks_run_in_order() {
        let pipeline = Pipeline::new()
            .hook(|mut v: Value, _: &PatternRecord, _: &RequestContext| {
                v["trail"] = json!("a");
                v
            })
            .hook(|mut v: Value, _: &PatternRecord, _: &RequestContext| {
                let prev = v["trail"].as_str().unwrap_or_default().to_string();
                v["trail"] = json!(prev + "b");
                v
            });

        let out = pipeline.apply(&[record(1)], &ctx());
        assert_eq!(out[0]["trail"], json!("ab"));
    }

    #[test]
    fn test_hook_can_return_scalar() {
        let pipeline = Pipeline::new()
            .hook(|_: Value, r: &PatternRecord, _: &RequestContext| json!(r.id * 10));

        let out = pipeline.apply(&[record(3), record(4)], &ctx());
        assert_eq!(out, vec![json!(30), json!(40)]);
    }

    #[test]
    fn test_hook_sees_raw_record_and_context() {
        let pipeline = Pipeline::new().hook(|mut v: Value, r: &PatternRecord, c: &RequestContext| {
            v["favorites"] = r.extra["favorite_count"].clone();
            v["context"] = json!(c.context.as_str());
            v
        });

        let out = pipeline.apply(&[record(1)], &ctx());
        assert_eq!(out[0]["favorites"], json!(1));
        assert_eq!(out[0]["context"], json!("view"));
    }

    #[test]
    fn test_shared_hook_counts_calls() {
        struct Counter(AtomicUsize);
        impl PatternHook for Counter {
            fn apply(&self, v: Value, _: &PatternRecord, _: &RequestContext) -> Value {
                self.0.fetch_add(1, Ordering::SeqCst);
                v
            }
        }

        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let mut pipeline = Pipeline::new();
        pipeline.add_hook(counter.clone());
        assert_eq!(pipeline.len(), 1);

        pipeline.apply(&[record(1), record(2), record(3)], &ctx());
        assert_eq!(counter.0.load(Ordering::SeqCst), 3);

        pipeline.apply(&[], &ctx());
        assert_eq!(counter.0.load(Ordering::SeqCst), 3);
    }
}
