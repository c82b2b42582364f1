//! Terminal states of the download step.

use std::fmt;
use std::path::PathBuf;

/// Why a download was skipped without writing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A file already exists at the destination.
    AlreadyDownloaded,
    /// The specimen has no picture URL.
    NoPicture,
}

impl SkipReason {
    /// Human-readable reason.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyDownloaded => "already downloaded",
            Self::NoPicture => "no picture available",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Nothing was fetched or written.
    Skipped(SkipReason),
    /// The image request returned a non-success status.
    Failed {
        /// HTTP status of the image response.
        status: u16,
    },
    /// The image was written to `path`.
    Succeeded {
        /// Destination file.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
}

impl DownloadOutcome {
    /// Human-readable reason for the outcome.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Skipped(reason) => reason.as_str(),
            Self::Failed { .. } => "download error",
            Self::Succeeded { .. } => "downloaded",
        }
    }

    /// Returns true for [`DownloadOutcome::Succeeded`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

impl fmt::Display for DownloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
            Self::Failed { status } => write!(f, "failed: download error (HTTP {status})"),
            Self::Succeeded { path, bytes } => {
                write!(f, "downloaded {bytes} bytes to {}", path.display())
            }
        }
    }
}
