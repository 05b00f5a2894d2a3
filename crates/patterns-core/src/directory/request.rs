//! Inbound request and response types.

use crate::query::RawParams;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Inbound request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    #[default]
    Get,
    /// Metadata-only: the listing is resolved but no body is produced.
    Head,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Head => "HEAD",
        }
    }

    /// Parse a method name, ignoring case. Only GET and HEAD are served.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("GET") {
            Some(RequestMethod::Get)
        } else if s.eq_ignore_ascii_case("HEAD") {
            Some(RequestMethod::Head)
        } else {
            None
        }
    }

    pub fn is_metadata_only(&self) -> bool {
        matches!(self, RequestMethod::Head)
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a listing was served from the transient store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// An inbound listing request before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryRequest {
    pub method: RequestMethod,
    pub params: RawParams,
}

impl DirectoryRequest {
    pub fn get(params: RawParams) -> Self {
        Self {
            method: RequestMethod::Get,
            params,
        }
    }

    pub fn head(params: RawParams) -> Self {
        Self {
            method: RequestMethod::Head,
            params,
        }
    }
}

/// A successful listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryResponse {
    pub status: u16,
    /// Output of the pipeline, one entry per pattern. Always empty for
    /// metadata-only requests.
    pub items: Vec<Value>,
    pub cache_status: CacheStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(RequestMethod::parse("get"), Some(RequestMethod::Get));
        assert_eq!(RequestMethod::parse("HEAD"), Some(RequestMethod::Head));
        assert_eq!(RequestMethod::parse("POST"), None);
        assert!(RequestMethod::Head.is_metadata_only());
        assert!(!RequestMethod::Get.is_metadata_only());
    }
}
