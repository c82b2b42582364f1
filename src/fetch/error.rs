//! Error types for HTML page fetches.
//!
//! A `FetchError` is a transport failure: the remote page could not be
//! retrieved. Missing elements inside a page are not errors and never
//! surface here.

use thiserror::Error;

/// Errors that can occur while fetching an HTML page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The endpoint URL or its query parameters could not be assembled.
    #[error("invalid endpoint URL: {url}")]
    InvalidUrl {
        /// The offending endpoint.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {reason}")]
    ClientBuild {
        /// Human-readable cause.
        reason: String,
    },
}

impl FetchError {
    /// Creates a network error, promoting reqwest timeouts to [`FetchError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a client construction error.
    pub fn client_build(reason: impl Into<String>) -> Self {
        Self::ClientBuild {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display_includes_status_and_url() {
        let error = FetchError::http_status("https://antweb.org/images.do", 503);
        let message = error.to_string();
        assert!(message.contains("503"), "{message}");
        assert!(message.contains("https://antweb.org/images.do"), "{message}");
    }

    #[test]
    fn test_invalid_url_display() {
        let error = FetchError::invalid_url("::nope");
        assert_eq!(error.to_string(), "invalid endpoint URL: ::nope");
    }
}
