//! Download step: idempotent, streamed fetch-and-write of specimen images.
//!
//! # Features
//!
//! - Existence check before any network request (cheap resume over a batch)
//! - Empty picture URL short-circuits without a request
//! - Non-success status reported as an outcome, not an error
//! - Streaming writes with partial-file cleanup on error
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use antweb_core::{ImageDownloader, ScraperConfig, SpecimenIdentity, SpecimenResult};
//! use antweb_core::resolver::Author;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = ImageDownloader::new(&ScraperConfig::default())?;
//! let result = SpecimenResult::from_parts(
//!     SpecimenIdentity::new("Atta", "cephalotes", ""),
//!     "Atta cephalotes",
//!     Author::default(),
//!     "https://example.org/full.tif",
//! );
//! let outcome = downloader.download_image(&result, Path::new("./output/images/0.tif")).await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod outcome;

pub use client::ImageDownloader;
pub use error::DownloadError;
pub use outcome::{DownloadOutcome, SkipReason};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
