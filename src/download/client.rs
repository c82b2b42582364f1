//! Image downloader with streaming writes.
//!
//! The checks run in a fixed order so re-runs stay cheap: an existing file is
//! detected before any network request is made.

use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};

use super::error::DownloadError;
use super::outcome::{DownloadOutcome, SkipReason};
use crate::config::ScraperConfig;
use crate::http::build_http_client;
use crate::specimen::SpecimenResult;

/// HTTP client for downloading specimen images.
///
/// Create once and reuse across specimens to share the connection pool.
///
/// # Example
///
/// ```no_run
/// use antweb_core::{ImageDownloader, ScraperConfig, SpecimenPipeline};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ScraperConfig::default();
/// let pipeline = SpecimenPipeline::new(&config)?;
/// let downloader = ImageDownloader::new(&config)?;
/// let result = pipeline.build_result("Atta", "cephalotes", "").await?;
/// let outcome = downloader
///     .download_image(&result, &config.image_dir().join("0.tif"))
///     .await?;
/// println!("{outcome}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    client: Client,
}

impl ImageDownloader {
    /// Creates a downloader using the download timeouts from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(config: &ScraperConfig) -> Result<Self, DownloadError> {
        let client = build_http_client(
            "downloader",
            config.connect_timeout_secs,
            config.download_read_timeout_secs,
        )
        .map_err(|failure| DownloadError::client_build(failure.to_string()))?;
        Ok(Self { client })
    }

    /// Downloads the picture of `result` to `destination`.
    ///
    /// Evaluated in order, first match wins:
    /// 1. `destination` exists: `Skipped(AlreadyDownloaded)`, no request.
    /// 2. `result` has no image URL: `Skipped(NoPicture)`, no request.
    /// 3. The image request returns a non-success status: `Failed`.
    /// 4. Otherwise parent directories are created and the body is streamed
    ///    to `destination` in chunks: `Succeeded`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] when the request cannot be sent, the body
    /// stream breaks, or the file cannot be written. A partially written file
    /// is removed before the error is returned.
    #[instrument(skip(self, result), fields(specimen = %result.identity()))]
    pub async fn download_image(
        &self,
        result: &SpecimenResult,
        destination: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let exists = tokio::fs::try_exists(destination)
            .await
            .map_err(|e| DownloadError::io(destination, e))?;
        if exists {
            debug!(path = %destination.display(), "destination exists");
            return Ok(DownloadOutcome::Skipped(SkipReason::AlreadyDownloaded));
        }

        let url = result.image_url();
        if url.is_empty() {
            debug!("no picture URL");
            return Ok(DownloadOutcome::Skipped(SkipReason::NoPicture));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "image request failed");
            return Ok(DownloadOutcome::Failed {
                status: status.as_u16(),
            });
        }

        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DownloadError::io(parent, e))?;
        }

        let mut file = File::create(destination)
            .await
            .map_err(|e| DownloadError::io(destination, e))?;

        let stream_result = stream_to_file(&mut file, response, url, destination).await;
        if stream_result.is_err() {
            // A leftover partial file would be mistaken for a finished download.
            debug!(path = %destination.display(), "cleaning up partial file after error");
            drop(file);
            let _ = tokio::fs::remove_file(destination).await;
        }
        let bytes = stream_result?;

        info!(path = %destination.display(), bytes, "download complete");
        Ok(DownloadOutcome::Succeeded {
            path: destination.to_path_buf(),
            bytes,
        })
    }
}

/// Streams the response body to `file`, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resolver::Author;
    use crate::specimen::SpecimenIdentity;

    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn result_with_url(url: &str) -> SpecimenResult {
        SpecimenResult::from_parts(
            SpecimenIdentity::new("Atta", "cephalotes", ""),
            "Atta cephalotes",
            Author::new("Jane Doe", "http://example.org/jane"),
            url,
        )
    }

    fn downloader() -> ImageDownloader {
        ImageDownloader::new(&ScraperConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_download_writes_body_and_creates_parents() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/full.tif"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"TIFFDATA".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("images").join("0.tif");
        let result = result_with_url(&format!("{}/full.tif", server.uri()));

        let outcome = downloader()
            .download_image(&result, &destination)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DownloadOutcome::Succeeded {
                path: destination.clone(),
                bytes: 8,
            }
        );
        assert_eq!(std::fs::read(&destination).unwrap(), b"TIFFDATA");
    }

    #[tokio::test]
    async fn test_download_skips_existing_file_before_checking_url() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("0.tif");
        std::fs::write(&destination, b"old").unwrap();

        let outcome = downloader()
            .download_image(&result_with_url(""), &destination)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DownloadOutcome::Skipped(SkipReason::AlreadyDownloaded)
        );
        assert_eq!(std::fs::read(&destination).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_download_empty_url_is_skipped() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("0.tif");

        let outcome = downloader()
            .download_image(&result_with_url(""), &destination)
            .await
            .unwrap();

        assert_eq!(outcome, DownloadOutcome::Skipped(SkipReason::NoPicture));
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_download_non_success_status_is_failed_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.tif"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("images").join("1.tif");
        let result = result_with_url(&format!("{}/missing.tif", server.uri()));

        let outcome = downloader()
            .download_image(&result, &destination)
            .await
            .unwrap();

        assert_eq!(outcome, DownloadOutcome::Failed { status: 404 });
        assert!(!destination.exists());
        assert!(
            !temp.path().join("images").exists(),
            "directories are only created after a successful response"
        );
    }

    #[tokio::test]
    async fn test_download_unreachable_host_is_error() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("2.tif");
        // Port 9 (discard) on localhost is closed in test environments.
        let result = result_with_url("http://127.0.0.1:9/full.tif");

        let error = downloader()
            .download_image(&result, &destination)
            .await
            .unwrap_err();

        assert!(
            matches!(
                error,
                DownloadError::Network { .. } | DownloadError::Timeout { .. }
            ),
            "unexpected error: {error}"
        );
        assert!(!destination.exists());
    }
}
