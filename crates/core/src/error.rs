//! Error types for Scrivener operations.
//!
//! This module defines [`ExtractionError`], the single error type returned by
//! the extraction pipeline. Only URL validation and fetching can fail; the
//! heuristic stages that follow always degrade to fallback values instead.
//!
//! # Example
//!
//! ```rust
//! use scrivener_core::{ErrorKind, validate_url};
//!
//! let err = validate_url("not a url").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidUrl);
//! assert_eq!(err.http_status(), 400);
//! ```

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Wire-level classification of an [`ExtractionError`].
///
/// Serializes to the snake_case names used by the HTTP contract
/// (`invalid_url`, `upstream_http_error`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUrl,
    NetworkUnreachable,
    #[serde(rename = "upstream_http_error")]
    UpstreamHttp,
    Timeout,
    Internal,
}

impl ErrorKind {
    /// Returns the snake_case wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidUrl => "invalid_url",
            ErrorKind::NetworkUnreachable => "network_unreachable",
            ErrorKind::UpstreamHttp => "upstream_http_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for extraction operations.
///
/// Messages are human-readable and meant to be shown to the user verbatim.
/// Raw diagnostic text from the underlying failure, when there is any, is
/// available through [`ExtractionError::details`].
///
/// # Example
///
/// ```rust
/// use scrivener_core::{ErrorKind, ExtractionError};
///
/// let err = ExtractionError::UpstreamHttp { status: 404, status_text: "Not Found".to_string() };
/// assert_eq!(err.kind(), ErrorKind::UpstreamHttp);
/// assert_eq!(err.http_status(), 404);
/// assert!(err.to_string().contains("404"));
/// ```
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The input is not an absolute `http`/`https` URL.
    ///
    /// Raised before any network access takes place.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure: DNS, connection refused, TLS, broken body.
    #[error("Failed to reach the source site: {message}")]
    NetworkUnreachable { message: String, details: Option<String> },

    /// The upstream answered with a status code of 400 or above.
    #[error("Source site responded with HTTP {status} {status_text}")]
    UpstreamHttp { status: u16, status_text: String },

    /// The fetch did not complete within the configured timeout.
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// Anything unclassified: a broken selector table, a cancelled call.
    #[error("Internal extraction error: {message}")]
    Internal { message: String, details: Option<String> },
}

impl ExtractionError {
    /// Builds an [`ExtractionError::Internal`] without details.
    pub fn internal(message: impl Into<String>) -> Self {
        ExtractionError::Internal { message: message.into(), details: None }
    }

    /// Returns the wire classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::InvalidUrl(_) => ErrorKind::InvalidUrl,
            ExtractionError::NetworkUnreachable { .. } => ErrorKind::NetworkUnreachable,
            ExtractionError::UpstreamHttp { .. } => ErrorKind::UpstreamHttp,
            ExtractionError::Timeout { .. } => ErrorKind::Timeout,
            ExtractionError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Raw text of the underlying failure, for diagnostics.
    pub fn details(&self) -> Option<&str> {
        match self {
            ExtractionError::NetworkUnreachable { details, .. } | ExtractionError::Internal { details, .. } => {
                details.as_deref()
            }
            _ => None,
        }
    }

    /// The upstream status code, if this is an upstream HTTP error.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ExtractionError::UpstreamHttp { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// HTTP status a caller-facing endpoint should answer with.
    ///
    /// Upstream errors pass the upstream status through, unless it is below
    /// 400 in which case 500 is used.
    pub fn http_status(&self) -> u16 {
        match self {
            ExtractionError::InvalidUrl(_) => 400,
            ExtractionError::UpstreamHttp { status, .. } if *status >= 400 => *status,
            ExtractionError::UpstreamHttp { .. } => 500,
            ExtractionError::Timeout { .. } | ExtractionError::NetworkUnreachable { .. } => 504,
            ExtractionError::Internal { .. } => 500,
        }
    }

    /// Classifies a reqwest failure.
    ///
    /// `timeout` is the configured request timeout, reported back in the
    /// message since reqwest does not carry it.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return ExtractionError::Timeout { timeout_ms: timeout.as_millis() as u64 };
        }
        if let Some(status) = err.status() {
            return ExtractionError::UpstreamHttp {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            };
        }
        if err.is_builder() {
            return ExtractionError::Internal {
                message: "failed to build the HTTP request".to_string(),
                details: Some(err.to_string()),
            };
        }
        ExtractionError::NetworkUnreachable {
            message: "the request could not be completed".to_string(),
            details: Some(err.to_string()),
        }
    }
}

/// Result type alias for ExtractionError.
pub type Result<T> = std::result::Result<T, ExtractionError>;
