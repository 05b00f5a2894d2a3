//! Request building and dispatch against the remote pattern directory.

use super::transport::{RawResponse, Transport};
use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, Result};
use crate::query::{NormalizedQuery, ParamValue, QueryParams};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Local parameter name to remote query-string name. Parameters missing from
/// this table are not sent.
const REMOTE_PARAM_NAMES: &[(&str, &str)] = &[
    ("per_page", "per_page"),
    ("page", "page"),
    ("offset", "offset"),
    ("order", "order"),
    ("orderby", "orderby"),
    ("search", "search"),
    ("slug", "slug"),
    ("category", "pattern-categories"),
    ("keyword", "pattern-keywords"),
];

/// Builds outbound URLs and performs the fetch.
pub struct RemoteFetcher {
    transport: Arc<dyn Transport>,
    api_base: Url,
    locale: Option<String>,
    client_version: Option<String>,
}

impl std::fmt::Debug for RemoteFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteFetcher")
            .field("api_base", &self.api_base.as_str())
            .field("locale", &self.locale)
            .field("client_version", &self.client_version)
            .finish()
    }
}

impl RemoteFetcher {
    pub fn new(transport: Arc<dyn Transport>, config: &DirectoryConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base).map_err(|e| DirectoryError::Config {
            message: format!("api_base is not a valid URL: {}", e),
        })?;

        Ok(Self {
            transport,
            api_base,
            locale: config.locale.clone(),
            client_version: config.client_version.clone(),
        })
    }

    /// Host requests are sent to.
    pub fn host(&self) -> Option<&str> {
        self.api_base.host_str()
    }

    /// The parameters sent upstream for `query`, under their remote names.
    ///
    /// This is also the input of the cache key, so anything that changes the
    /// remote answer (including locale and client version) must appear here.
    pub fn outbound_params(&self, query: &NormalizedQuery) -> QueryParams {
        let local = query.to_params();
        let mut outbound = QueryParams::new();

        for (local_name, remote_name) in REMOTE_PARAM_NAMES {
            match local.get(local_name) {
                Some(ParamValue::List(items)) if items.is_empty() => {}
                Some(value) => outbound.insert(*remote_name, value.clone()),
                None => {}
            }
        }

        if let Some(ref locale) = self.locale {
            outbound.insert("locale", locale.as_str());
        }
        if let Some(ref version) = self.client_version {
            outbound.insert("wp-version", version.as_str());
        }

        outbound
    }

    /// Full request URL for an outbound parameter map.
    pub fn build_url(&self, params: &QueryParams) -> Url {
        let mut url = self.api_base.clone();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params.iter() {
                pairs.append_pair(name, &value.to_query_value());
            }
        }
        url
    }

    /// Fetch the listing for `query`.
    ///
    /// Only failures to obtain a response are errors here. A non-2xx answer
    /// whose body is JSON is returned as-is so the parser can report it as a
    /// contract violation; any other non-2xx answer is a transport failure.
    pub async fn fetch(&self, query: &NormalizedQuery) -> Result<RawResponse> {
        let url = self.build_url(&self.outbound_params(query));
        debug!("Fetching patterns from {}", url);

        let response = self.transport.get(&url).await?;

        if response.is_success() {
            return Ok(response);
        }

        if serde_json::from_str::<serde_json::Value>(&response.body).is_ok() {
            warn!(
                "Pattern directory returned {} with a JSON body",
                response.status
            );
            return Ok(response);
        }

        Err(DirectoryError::Transport {
            message: format!("directory returned HTTP {}", response.status),
            host: url.host_str().map(String::from),
            status_code: Some(response.status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        urls: Mutex<Vec<String>>,
        response: RawResponse,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn get(&self, url: &Url) -> Result<RawResponse> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(self.response.clone())
        }
    }

    fn fetcher_with(response: RawResponse, config: &DirectoryConfig) -> (RemoteFetcher, Arc<Recorder>) {
        let recorder = Arc::new(Recorder {
            urls: Mutex::new(Vec::new()),
            response,
        });
        let fetcher = RemoteFetcher::new(recorder.clone(), config).unwrap();
        (fetcher, recorder)
    }

    #[test]
    fn test_default_query_url() {
        let (fetcher, _) = fetcher_with(RawResponse::ok("[]"), &DirectoryConfig::default());
        let url = fetcher.build_url(&fetcher.outbound_params(&NormalizedQuery::default()));

        assert_eq!(url.host_str(), Some("api.wordpress.org"));
        assert_eq!(url.path(), "/patterns/1.0/");
        let query = url.query().unwrap();
        assert!(query.contains("per_page=100"));
        assert!(query.contains("page=1"));
        assert!(query.contains("order=desc"));
        assert!(query.contains("orderby=date"));
        assert!(!query.contains("offset"));
        assert!(!query.contains("slug"));
    }

    #[test]
    fn test_filters_use_remote_names() {
        let config = DirectoryConfig {
            locale: Some("fr_FR".into()),
            client_version: Some("6.4".into()),
            ..Default::default()
        };
        let (fetcher, _) = fetcher_with(RawResponse::ok("[]"), &config);
        let query = NormalizedQuery {
            category: Some(2),
            keyword: Some(11),
            slug: vec!["b".into(), "a".into()],
            ..Default::default()
        };

        let params = fetcher.outbound_params(&query);
        assert_eq!(params.get("pattern-categories"), Some(&ParamValue::Int(2)));
        assert_eq!(params.get("pattern-keywords"), Some(&ParamValue::Int(11)));
        assert!(!params.contains("category"));
        assert_eq!(params.get("locale").and_then(|v| v.as_text()), Some("fr_FR"));
        assert_eq!(params.get("wp-version").and_then(|v| v.as_text()), Some("6.4"));

        let url = fetcher.build_url(&params);
        assert!(url.query().unwrap().contains("slug=b%2Ca"));
    }

    #[tokio::test]
    async fn test_fetch_sends_offset_once() {
        let (fetcher, recorder) = fetcher_with(RawResponse::ok("[]"), &DirectoryConfig::default());
        let query = NormalizedQuery {
            offset: Some(5),
            ..Default::default()
        };

        let response = fetcher.fetch(&query).await.unwrap();
        assert_eq!(response.body, "[]");

        let urls = recorder.urls.lock().unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].matches("offset=5").count(), 1);
    }

    #[tokio::test]
    async fn test_non_json_error_status_is_transport_error() {
        let (fetcher, _) = fetcher_with(
            RawResponse::new(502, "<html>Bad Gateway</html>"),
            &DirectoryConfig::default(),
        );

        let err = fetcher.fetch(&NormalizedQuery::default()).await.unwrap_err();
        match err {
            DirectoryError::Transport {
                host, status_code, ..
            } => {
                assert_eq!(host.as_deref(), Some("api.wordpress.org"));
                assert_eq!(status_code, Some(502));
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_json_error_status_is_passed_through() {
        let (fetcher, _) = fetcher_with(
            RawResponse::new(404, r#"{"code":"not_found","message":"Nope"}"#),
            &DirectoryConfig::default(),
        );

        let response = fetcher.fetch(&NormalizedQuery::default()).await.unwrap();
        assert_eq!(response.status, 404);
    }
}
