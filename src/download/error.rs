//! Error types for the download step.
//!
//! A non-success HTTP status on the image request is not an error; it is
//! reported as [`DownloadOutcome::Failed`](super::DownloadOutcome::Failed).
//! The variants here cover transport and filesystem failures only.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while downloading a specimen image.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// File system error during download (create dir, create file, write, etc.)
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {reason}")]
    ClientBuild {
        /// Human-readable cause.
        reason: String,
    },
}

impl DownloadError {
    /// Creates a network error, promoting reqwest timeouts to [`DownloadError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a client construction error.
    pub fn client_build(reason: impl Into<String>) -> Self {
        Self::ClientBuild {
            reason: reason.into(),
        }
    }
}
