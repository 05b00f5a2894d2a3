//! Error types for the pattern directory proxy.
//!
//! Three kinds are visible to callers of the directory: validation failures
//! (client input), transport failures (the directory host could not be
//! reached) and structural failures (the host answered with something that is
//! not a pattern list). The remaining variants are ambient failures from the
//! storage and configuration layers.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Stable error code for rejected query parameters.
pub const CODE_INVALID_PARAM: &str = "rest_invalid_param";
/// Stable error code for failures reaching the directory host.
pub const CODE_API_FAILED: &str = "patterns_api_failed";
/// Stable error code for payloads that violate the list-of-patterns contract.
pub const CODE_INVALID_RESPONSE: &str = "patterns_api_invalid_response";
/// Stable error code for everything else.
pub const CODE_INTERNAL: &str = "patterns_internal_error";

/// Main error type for the pattern directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Invalid parameter(s): {param} ({message})")]
    Validation { param: String, message: String },

    #[error("Could not reach {}: {message}", host.as_deref().unwrap_or("the pattern directory"))]
    Transport {
        message: String,
        /// Host the request was addressed to, when the URL was well formed.
        host: Option<String>,
        status_code: Option<u16>,
    },

    #[error("Unexpected response from the pattern directory: {message}")]
    Structural {
        message: String,
        /// HTTP status the directory answered with.
        status_code: Option<u16>,
    },

    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Error body returned to inbound callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub data: ErrorData,
}

/// Extra data attached to an [`ErrorPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorData {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl From<std::io::Error> for DirectoryError {
    fn from(err: std::io::Error) -> Self {
        DirectoryError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        DirectoryError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for DirectoryError {
    fn from(err: rusqlite::Error) -> Self {
        DirectoryError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl DirectoryError {
    /// Build a validation error for a single parameter.
    pub fn invalid_param(param: impl Into<String>, message: impl Into<String>) -> Self {
        DirectoryError::Validation {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Build a structural error with no status attached.
    pub fn structural(message: impl Into<String>) -> Self {
        DirectoryError::Structural {
            message: message.into(),
            status_code: None,
        }
    }

    /// Machine-readable error code.
    ///
    /// Zero results is never an error, so none of these codes can be confused
    /// with an empty listing.
    pub fn code(&self) -> &'static str {
        match self {
            DirectoryError::Validation { .. } => CODE_INVALID_PARAM,
            DirectoryError::Transport { .. } => CODE_API_FAILED,
            DirectoryError::Structural { .. } => CODE_INVALID_RESPONSE,
            _ => CODE_INTERNAL,
        }
    }

    /// HTTP status used when the error is surfaced to an inbound caller.
    pub fn http_status(&self) -> u16 {
        match self {
            DirectoryError::Validation { .. } => 400,
            _ => 500,
        }
    }

    /// Whether the error was caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DirectoryError::Validation { .. })
    }

    /// Convert into the `{code, message}` body returned to callers.
    pub fn to_payload(&self) -> ErrorPayload {
        let param = match self {
            DirectoryError::Validation { param, .. } => Some(param.clone()),
            _ => None,
        };

        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            data: ErrorData {
                status: self.http_status(),
                param,
            },
        }
    }
}
