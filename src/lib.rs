//! AntWeb Scraper Core Library
//!
//! This library resolves specimen records (genus, species, subspecies) into
//! reference images hosted on AntWeb and persists each image to disk once.
//!
//! # Architecture
//!
//! The library is organized into the following modules, leaf-first:
//! - [`fetch`] - HTTP GET returning a queryable HTML document
//! - [`resolver`] - Canonical name, author and picture URL lookups
//! - [`specimen`] - Specimen identity and the resolved result record
//! - [`download`] - Idempotent, streamed image download step
//! - [`sidecar`] - Attribution metadata written next to images
//! - [`input`] - Tabular specimen input reader
//! - [`batch`] - Sequential driver over many specimens
//! - [`config`] - Explicit endpoint and output configuration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod config;
pub mod download;
pub mod fetch;
mod http;
pub mod input;
pub mod resolver;
pub mod sidecar;
pub mod specimen;
mod user_agent;

// Re-export commonly used types
pub use batch::{BatchReport, BatchRunner, BatchSetupError, SpecimenReport, SpecimenStatus};
pub use config::ScraperConfig;
pub use download::{DownloadError, DownloadOutcome, ImageDownloader, SkipReason};
pub use fetch::{Document, Element, FetchError, HtmlFetcher};
pub use input::{InputError, SpecimenInput, SpecimenRow, read_specimen_rows};
pub use resolver::{Author, ImageQuery, MetadataResolver, PictureQuery, PictureResolver};
pub use specimen::{SpecimenIdentity, SpecimenPipeline, SpecimenResult};
