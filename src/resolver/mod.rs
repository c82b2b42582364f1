//! Remote lookups that turn a specimen identity into picture metadata.
//!
//! # Architecture
//!
//! - [`MetadataResolver`] - identity to canonical display name (images endpoint)
//! - [`PictureResolver`] - canonical name to author and picture URL (picture endpoint)
//! - [`ImageQuery`] / [`PictureQuery`] - typed request parameters
//!
//! Absent page elements are normal data: every lookup answers with empty
//! strings rather than an error. Only transport failures are errors.

mod metadata;
mod picture;

pub use metadata::{MetadataResolver, extract_canonical_name};
pub use picture::{
    Author, PictureResolver, extract_author, extract_picture_url, picture_url_fallback,
};

/// Query parameters for the images endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageQuery {
    /// Genus, already alphanumeric-filtered by the caller.
    pub genus: String,
    /// Species epithet.
    pub species: String,
    /// Taxonomic rank of the listing.
    pub rank: String,
    /// AntWeb project scope.
    pub project: String,
}

impl ImageQuery {
    /// Creates a species-rank query across all AntWeb projects.
    #[must_use]
    pub fn new(genus: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            genus: genus.into(),
            species: species.into(),
            rank: "species".to_string(),
            project: "allantwebants".to_string(),
        }
    }

    /// Query string pairs in the order the endpoint documents them.
    #[must_use]
    pub fn params(&self) -> [(&str, &str); 4] {
        [
            ("genus", self.genus.as_str()),
            ("species", self.species.as_str()),
            ("rank", self.rank.as_str()),
            ("project", self.project.as_str()),
        ]
    }
}

/// Query parameters for the picture endpoint. Defaults to the first headshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureQuery {
    /// Canonical specimen name.
    pub name: String,
    /// Shot orientation code (`h` = headshot).
    pub shot: String,
    /// Shot number.
    pub number: String,
}

impl PictureQuery {
    /// Creates a query for the first headshot of `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shot: "h".to_string(),
            number: "1".to_string(),
        }
    }

    /// Query string pairs.
    #[must_use]
    pub fn params(&self) -> [(&str, &str); 3] {
        [
            ("name", self.name.as_str()),
            ("shot", self.shot.as_str()),
            ("number", self.number.as_str()),
        ]
    }
}
