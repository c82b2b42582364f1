//! Sequential batch driver.
//!
//! Processes specimen rows one at a time, strictly in order. Each specimen is
//! resolved and downloaded to completion before the next one starts. A
//! failure on one specimen is recorded and the batch moves on.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};

use crate::config::ScraperConfig;
use crate::download::{DownloadError, DownloadOutcome, ImageDownloader, SkipReason};
use crate::fetch::FetchError;
use crate::input::SpecimenRow;
use crate::sidecar::write_attribution_sidecar;
use crate::specimen::{SpecimenIdentity, SpecimenPipeline};

/// File extension of stored images.
pub const IMAGE_EXTENSION: &str = "tif";

/// Image path for a row index: `<image_dir>/<index>.tif`.
#[must_use]
pub fn image_path(image_dir: &Path, index: usize) -> PathBuf {
    image_dir.join(format!("{index}.{IMAGE_EXTENSION}"))
}

/// What happened to one specimen.
#[derive(Debug)]
pub enum SpecimenStatus {
    /// The download step ran (or was short-circuited) and reported an outcome.
    Outcome(DownloadOutcome),
    /// Resolution failed with a transport error; nothing was downloaded.
    ResolveFailed(FetchError),
    /// The image transfer or file write failed.
    DownloadFailed(DownloadError),
}

impl fmt::Display for SpecimenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outcome(outcome) => write!(f, "{outcome}"),
            Self::ResolveFailed(error) => write!(f, "resolution error: {error}"),
            Self::DownloadFailed(error) => write!(f, "download error: {error}"),
        }
    }
}

/// Per-specimen entry in a [`BatchReport`].
#[derive(Debug)]
pub struct SpecimenReport {
    /// Input row index.
    pub index: usize,
    /// Identity read from the row.
    pub identity: SpecimenIdentity,
    /// Outcome for this specimen.
    pub status: SpecimenStatus,
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Per-specimen results in processing order.
    pub specimens: Vec<SpecimenReport>,
}

impl BatchReport {
    /// Number of images written in this run.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.count(|status| matches!(status, SpecimenStatus::Outcome(o) if o.is_success()))
    }

    /// Number of specimens skipped (already downloaded or no picture).
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, SpecimenStatus::Outcome(DownloadOutcome::Skipped(_))))
    }

    /// Number of specimens whose image request returned a non-success status.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|status| {
            matches!(status, SpecimenStatus::Outcome(DownloadOutcome::Failed { .. }))
        })
    }

    /// Number of specimens aborted by a transport or filesystem error.
    #[must_use]
    pub fn errored(&self) -> usize {
        self.count(|status| {
            matches!(
                status,
                SpecimenStatus::ResolveFailed(_) | SpecimenStatus::DownloadFailed(_)
            )
        })
    }

    /// Total specimens processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.specimens.len()
    }

    fn count(&self, predicate: impl Fn(&SpecimenStatus) -> bool) -> usize {
        self.specimens
            .iter()
            .filter(|report| predicate(&report.status))
            .count()
    }
}

/// Drives resolution and download over many rows.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    pipeline: SpecimenPipeline,
    downloader: ImageDownloader,
    image_dir: PathBuf,
    sidecar: bool,
}

impl BatchRunner {
    /// Creates a runner from explicit parts.
    #[must_use]
    pub fn new(
        pipeline: SpecimenPipeline,
        downloader: ImageDownloader,
        image_dir: impl Into<PathBuf>,
        sidecar: bool,
    ) -> Self {
        Self {
            pipeline,
            downloader,
            image_dir: image_dir.into(),
            sidecar,
        }
    }

    /// Creates a runner with clients and paths taken from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BatchSetupError`] if either HTTP client cannot be constructed.
    pub fn from_config(config: &ScraperConfig) -> Result<Self, BatchSetupError> {
        Ok(Self::new(
            SpecimenPipeline::new(config)?,
            ImageDownloader::new(config)?,
            config.image_dir(),
            config.sidecar,
        ))
    }

    /// Directory images are written to.
    #[must_use]
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Processes `rows` in order and reports each specimen.
    pub async fn run(&self, rows: &[SpecimenRow]) -> BatchReport {
        let mut report = BatchReport::default();
        for row in rows {
            let status = self.process(row).await;
            log_status(row, &status);
            report.specimens.push(SpecimenReport {
                index: row.index,
                identity: SpecimenIdentity::new(&row.genus, &row.species, &row.subspecies),
                status,
            });
        }
        info!(
            total = report.total(),
            succeeded = report.succeeded(),
            skipped = report.skipped(),
            failed = report.failed(),
            errored = report.errored(),
            "Batch complete"
        );
        report
    }

    #[instrument(skip(self, row), fields(index = row.index))]
    async fn process(&self, row: &SpecimenRow) -> SpecimenStatus {
        let destination = image_path(&self.image_dir, row.index);

        // Avoid the three page lookups entirely when the image is already on disk.
        if destination.exists() {
            return SpecimenStatus::Outcome(DownloadOutcome::Skipped(
                SkipReason::AlreadyDownloaded,
            ));
        }

        let result = match self
            .pipeline
            .build_result(&row.genus, &row.species, &row.subspecies)
            .await
        {
            Ok(result) => result,
            Err(error) => return SpecimenStatus::ResolveFailed(error),
        };

        let outcome = match result.download(&self.downloader, &destination).await {
            Ok(outcome) => outcome,
            Err(error) => return SpecimenStatus::DownloadFailed(error),
        };

        if self.sidecar
            && let Err(error) = write_attribution_sidecar(&result, &destination)
        {
            warn!(error = %error, "Failed to write attribution sidecar");
        }

        SpecimenStatus::Outcome(outcome)
    }
}

fn log_status(row: &SpecimenRow, status: &SpecimenStatus) {
    let specimen = format!("{} {} {}", row.genus, row.species, row.subspecies);
    match status {
        SpecimenStatus::Outcome(DownloadOutcome::Succeeded { path, bytes }) => {
            info!(index = row.index, specimen = %specimen, path = %path.display(), bytes, "Downloaded");
        }
        SpecimenStatus::Outcome(DownloadOutcome::Skipped(reason)) => {
            warn!(index = row.index, specimen = %specimen, reason = %reason, "Skipped");
        }
        SpecimenStatus::Outcome(DownloadOutcome::Failed { status }) => {
            warn!(index = row.index, specimen = %specimen, status, "Failed: download error");
        }
        SpecimenStatus::ResolveFailed(error) => {
            error!(index = row.index, specimen = %specimen, error = %error, "Resolution failed");
        }
        SpecimenStatus::DownloadFailed(error) => {
            error!(index = row.index, specimen = %specimen, error = %error, "Download failed");
        }
    }
}

/// Errors constructing a [`BatchRunner`].
#[derive(Debug, thiserror::Error)]
pub enum BatchSetupError {
    /// The page fetcher client could not be built.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The image downloader client could not be built.
    #[error(transparent)]
    Download(#[from] DownloadError),
}
