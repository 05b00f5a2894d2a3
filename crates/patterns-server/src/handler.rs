//! HTTP request handlers.

use crate::server::AppState;
use axum::{
    extract::{RawQuery, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use patterns_core::{DirectoryRequest, RawParams, RequestMethod};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

/// Response header reporting whether the listing came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Pattern listing endpoint. Only `GET` and `HEAD` are served.
pub async fn handle_patterns(
    State(state): State<Arc<AppState>>,
    method: Method,
    RawQuery(query): RawQuery,
) -> Response {
    let Some(method) = RequestMethod::parse(method.as_str()) else {
        debug!("Rejected {} /patterns", method);
        return (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "GET, HEAD")]).into_response();
    };
    let request = DirectoryRequest {
        method,
        params: query_to_params(query.as_deref()),
    };

    debug!("{} /patterns {:?}", method, request.params);

    match state.directory.get_items(&request).await {
        Ok(response) => {
            let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
            let headers = [(CACHE_STATUS_HEADER, response.cache_status.as_str())];
            if method.is_metadata_only() {
                (status, headers).into_response()
            } else {
                (status, headers, Json(response.items)).into_response()
            }
        }
        Err(e) => {
            if e.is_client_error() {
                debug!("Rejected pattern request: {}", e);
            } else {
                error!("Pattern request failed: {}", e);
            }
            let payload = e.to_payload();
            let status = StatusCode::from_u16(payload.data.status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(payload)).into_response()
        }
    }
}

/// Decode a query string into raw parameters.
///
/// `slug` and `slug[]` may repeat and are gathered into one list; for any
/// other name the last occurrence wins.
fn query_to_params(query: Option<&str>) -> RawParams {
    let mut params = RawParams::new();
    let mut slugs = Vec::new();

    for (name, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        match name.as_ref() {
            "slug" | "slug[]" => slugs.push(Value::String(value.into_owned())),
            _ => {
                params.insert(name.into_owned(), Value::String(value.into_owned()));
            }
        }
    }

    match slugs.len() {
        0 => {}
        // A lone value may itself be a comma-separated list.
        1 => {
            params.insert("slug".to_string(), slugs.remove(0));
        }
        _ => {
            params.insert("slug".to_string(), Value::Array(slugs));
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::router;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use patterns_core::{
        DirectoryError, MemoryTransientStore, PatternDirectory, RawResponse, Transport,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use serde_json::json;
    use tower::ServiceExt;
    use url::Url;

    const ONE_PATTERN: &str = r#"[{
        "id": 5,
        "title": {"rendered": "Two buttons"},
        "pattern_content": "<!-- wp:buttons /-->",
        "category_slugs": ["buttons"],
        "meta": {"wpop_description": "Two buttons.", "wpop_keywords": "button"},
        "extra_field": "dropped"
    }]"#;

    struct CannedTransport {
        body: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn get(&self, url: &Url) -> patterns_core::Result<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.body {
                Some(body) => Ok(RawResponse::ok(body)),
                None => Err(DirectoryError::Transport {
                    message: "connection refused".into(),
                    host: url.host_str().map(String::from),
                    status_code: None,
                }),
            }
        }
    }

    fn app(body: Option<&'static str>) -> (axum::Router, Arc<CannedTransport>) {
        let transport = Arc::new(CannedTransport {
            body,
            calls: AtomicUsize::new(0),
        });
        let directory = PatternDirectory::builder()
            .transport(transport.clone())
            .store(Arc::new(MemoryTransientStore::new(10)))
            .build()
            .unwrap();
        (router(directory), transport)
    }

    async fn send(app: &axum::Router, method: &str, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let cache = response
            .headers()
            .get(CACHE_STATUS_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, cache, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_query_to_params() {
        let params = query_to_params(Some("per_page=10&slug=a&slug[]=b&search=two+words"));
        assert_eq!(params["per_page"], json!("10"));
        assert_eq!(params["slug"], json!(["a", "b"]));
        assert_eq!(params["search"], json!("two words"));

        let params = query_to_params(Some("slug=a%2Cb"));
        assert_eq!(params["slug"], json!("a,b"));

        assert!(query_to_params(None).is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(Some("[]"));
        let (status, _, body) = send(&app, "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn test_unserved_method_is_405() {
        let (app, transport) = app(Some(ONE_PATTERN));
        for method in ["POST", "PUT", "DELETE"] {
            let (status, cache, body) = send(&app, method, "/patterns").await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert!(cache.is_none());
            assert!(body.is_empty());
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_then_cached() {
        let (app, transport) = app(Some(ONE_PATTERN));

        let (status, cache, body) = send(&app, "GET", "/patterns?category=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("MISS"));
        let items: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(items[0]["id"], json!(5));
        assert!(items[0].get("extra_field").is_none());

        let (status, cache, _) = send(&app, "GET", "/patterns?category=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("HIT"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_head_has_empty_body() {
        let (app, transport) = app(Some(ONE_PATTERN));
        let (status, cache, body) = send(&app, "HEAD", "/patterns").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("MISS"));
        assert!(body.is_empty());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_param_is_400() {
        let (app, transport) = app(Some("[]"));
        let (status, _, body) = send(&app, "GET", "/patterns?per_page=200").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let payload: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(payload["code"], json!("rest_invalid_param"));
        assert_eq!(payload["data"]["status"], json!(400));
        assert!(payload["message"].as_str().unwrap().contains("per_page"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_500() {
        let (app, _) = app(None);
        let (status, _, body) = send(&app, "GET", "/patterns").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let payload: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(payload["code"], json!("patterns_api_failed"));
        assert!(payload["message"]
            .as_str()
            .unwrap()
            .contains("api.wordpress.org"));
    }

    #[tokio::test]
    async fn test_blank_remote_body_is_500() {
        let (app, _) = app(Some(""));
        let (status, _, body) = send(&app, "GET", "/patterns").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let payload: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(payload["code"], json!("patterns_api_invalid_response"));
    }
}
