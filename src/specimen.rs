//! Specimen identity and the resolved result record.
//!
//! A [`SpecimenResult`] is built eagerly: construction performs the canonical
//! name lookup and both picture lookups. Once built it never changes and is a
//! snapshot of the remote pages at that moment.

use std::fmt;
use std::path::Path;

use tracing::{debug, instrument};

use crate::config::ScraperConfig;
use crate::download::{DownloadError, DownloadOutcome, ImageDownloader};
use crate::fetch::{FetchError, HtmlFetcher};
use crate::resolver::{Author, MetadataResolver, PictureResolver};

/// License the AntWeb pictures are published under.
pub const LICENSE_NAME: &str = "CC BY 4.0";

/// Canonical deed URL for [`LICENSE_NAME`].
pub const LICENSE_URL: &str = "https://creativecommons.org/licenses/by/4.0/";

/// One genus/species/subspecies record from the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecimenIdentity {
    genus: String,
    species: String,
    subspecies: String,
}

impl SpecimenIdentity {
    /// Creates an identity. `subspecies` may be empty.
    #[must_use]
    pub fn new(
        genus: impl Into<String>,
        species: impl Into<String>,
        subspecies: impl Into<String>,
    ) -> Self {
        Self {
            genus: genus.into(),
            species: species.into(),
            subspecies: subspecies.into(),
        }
    }

    /// Genus name.
    #[must_use]
    pub fn genus(&self) -> &str {
        &self.genus
    }

    /// Species epithet.
    #[must_use]
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Subspecies epithet, possibly empty.
    #[must_use]
    pub fn subspecies(&self) -> &str {
        &self.subspecies
    }
}

/// Diagnostic form `"<genus> <species> <subspecies>"`; the trailing space is
/// kept when the subspecies is empty.
impl fmt::Display for SpecimenIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.genus, self.species, self.subspecies)
    }
}

/// Everything known about one specimen after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecimenResult {
    identity: SpecimenIdentity,
    canonical_name: String,
    author: Author,
    image_url: String,
}

impl SpecimenResult {
    /// Assembles a result from already-resolved parts.
    #[must_use]
    pub fn from_parts(
        identity: SpecimenIdentity,
        canonical_name: impl Into<String>,
        author: Author,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            canonical_name: canonical_name.into(),
            author,
            image_url: image_url.into(),
        }
    }

    /// The identity this result was built from.
    #[must_use]
    pub fn identity(&self) -> &SpecimenIdentity {
        &self.identity
    }

    /// Display name assigned by AntWeb, `""` if the name lookup found nothing.
    #[must_use]
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// Credited photographer; empty fields when not found.
    #[must_use]
    pub fn author(&self) -> &Author {
        &self.author
    }

    /// Full-resolution picture URL, `""` if no picture reference exists.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Attribution sentence for the picture license.
    ///
    /// Always produces the fixed sentence, substituting empty strings for
    /// missing fields.
    #[must_use]
    pub fn cc_license_text(&self) -> String {
        format!(
            "{} by {}, from {}, is licensed under {LICENSE_NAME}.",
            self.canonical_name, self.author.name, self.author.url
        )
    }

    /// Downloads this specimen's picture to `destination`.
    ///
    /// # Errors
    ///
    /// See [`ImageDownloader::download_image`].
    pub async fn download(
        &self,
        downloader: &ImageDownloader,
        destination: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        downloader.download_image(self, destination).await
    }
}

/// Chains the metadata and picture resolvers into [`SpecimenResult`]s.
#[derive(Debug, Clone)]
pub struct SpecimenPipeline {
    metadata: MetadataResolver,
    picture: PictureResolver,
}

impl SpecimenPipeline {
    /// Creates a pipeline against the endpoints in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let fetcher = HtmlFetcher::new(config)?;
        Ok(Self::with_fetcher(fetcher, config))
    }

    /// Creates a pipeline that reuses an existing fetcher.
    #[must_use]
    pub fn with_fetcher(fetcher: HtmlFetcher, config: &ScraperConfig) -> Self {
        Self {
            metadata: MetadataResolver::new(fetcher.clone(), config.images_url()),
            picture: PictureResolver::new(fetcher, config.picture_url()),
        }
    }

    /// Resolves one specimen: canonical name first, then author and picture
    /// URL keyed by that name.
    ///
    /// An empty canonical name is not special-cased; the picture lookups are
    /// still issued with `name=""` and come back empty.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if any of the three page fetches fails.
    #[instrument(skip(self))]
    pub async fn build_result(
        &self,
        genus: &str,
        species: &str,
        subspecies: &str,
    ) -> Result<SpecimenResult, FetchError> {
        let identity = SpecimenIdentity::new(genus, species, subspecies);

        let canonical_name = self.metadata.resolve_canonical_name(&identity).await?;
        let author = self.picture.resolve_author(&canonical_name).await?;
        let image_url = self.picture.resolve_picture_url(&canonical_name).await?;

        debug!(
            canonical_name = %canonical_name,
            author = %author.name,
            has_picture = !image_url.is_empty(),
            "specimen resolved"
        );

        Ok(SpecimenResult::from_parts(
            identity,
            canonical_name,
            author,
            image_url,
        ))
    }
}
