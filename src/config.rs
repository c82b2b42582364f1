//! Explicit runtime configuration for endpoints, timeouts and output paths.
//!
//! A [`ScraperConfig`] is built once by the caller and handed to the fetcher
//! and downloader at construction time. Nothing in the library reads
//! process-wide constants for endpoints or output locations.

use std::path::PathBuf;

use url::Url;

/// Default AntWeb site root.
pub const DEFAULT_BASE_URL: &str = "https://antweb.org";

/// Path of the specimen images listing, relative to the base URL.
pub const DEFAULT_IMAGES_PATH: &str = "images.do";

/// Path of the single picture page, relative to the base URL.
pub const DEFAULT_PICTURE_PATH: &str = "bigPicture.do";

/// Default output root; images land in `<output_dir>/images`.
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Default HTTP connect timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default read timeout for HTML page lookups (30 seconds).
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Default read timeout for image downloads (5 minutes for large TIFFs).
pub const DEFAULT_DOWNLOAD_READ_TIMEOUT_SECS: u64 = 300;

/// Configuration shared by the fetcher, resolvers and download step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    /// Site root, e.g. `https://antweb.org`.
    pub base_url: String,
    /// Images endpoint path relative to `base_url`.
    pub images_path: String,
    /// Picture endpoint path relative to `base_url`.
    pub picture_path: String,
    /// Root output directory.
    pub output_dir: PathBuf,
    /// Connect timeout applied to every client.
    pub connect_timeout_secs: u64,
    /// Read timeout for HTML page lookups.
    pub read_timeout_secs: u64,
    /// Read timeout for image downloads.
    pub download_read_timeout_secs: u64,
    /// Write attribution sidecars next to downloaded images.
    pub sidecar: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            images_path: DEFAULT_IMAGES_PATH.to_string(),
            picture_path: DEFAULT_PICTURE_PATH.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            download_read_timeout_secs: DEFAULT_DOWNLOAD_READ_TIMEOUT_SECS,
            sidecar: false,
        }
    }
}

impl ScraperConfig {
    /// Creates a default configuration pointed at a different site root.
    ///
    /// Used by integration tests to aim the pipeline at a mock server.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full URL of the images endpoint.
    #[must_use]
    pub fn images_url(&self) -> String {
        join_endpoint(&self.base_url, &self.images_path)
    }

    /// Full URL of the picture endpoint.
    #[must_use]
    pub fn picture_url(&self) -> String {
        join_endpoint(&self.base_url, &self.picture_path)
    }

    /// Directory where specimen images are written.
    #[must_use]
    pub fn image_dir(&self) -> PathBuf {
        self.output_dir.join("images")
    }

    /// Returns true when `base_url` parses as an absolute http(s) URL.
    #[must_use]
    pub fn has_valid_base_url(&self) -> bool {
        Url::parse(&self.base_url).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
    }
}

fn join_endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
