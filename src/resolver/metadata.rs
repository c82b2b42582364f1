//! Canonical name lookup against the images endpoint.

use tracing::{debug, instrument};

use crate::fetch::{Document, FetchError, HtmlFetcher};
use crate::specimen::SpecimenIdentity;

use super::ImageQuery;

/// Resolves a specimen identity into the display name AntWeb uses for it.
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    fetcher: HtmlFetcher,
    endpoint: String,
}

impl MetadataResolver {
    /// Creates a resolver querying `endpoint` (the full images URL).
    #[must_use]
    pub fn new(fetcher: HtmlFetcher, endpoint: impl Into<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
        }
    }

    /// Fetches the images page for `identity` and returns the trimmed text of
    /// its name element, or `""` when the page has none.
    ///
    /// Only genus and species are sent; the subspecies is not part of the query.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the page cannot be retrieved.
    #[instrument(skip(self), fields(specimen = %identity))]
    pub async fn resolve_canonical_name(
        &self,
        identity: &SpecimenIdentity,
    ) -> Result<String, FetchError> {
        let query = ImageQuery::new(identity.genus(), identity.species());
        let doc = self.fetcher.fetch(&self.endpoint, &query.params()).await?;
        let name = extract_canonical_name(&doc);
        if name.is_empty() {
            debug!("images page has no name element");
        }
        Ok(name)
    }
}

/// Trimmed text of the first `div.name`, or `""` if absent.
#[must_use]
pub fn extract_canonical_name(doc: &Document) -> String {
    doc.find("div", "class", "name")
        .map(|div| div.text().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_canonical_name_trims_whitespace() {
        let doc = Document::parse("<div class=\"name\">\n   Atta cephalotes \n</div>");
        assert_eq!(extract_canonical_name(&doc), "Atta cephalotes");
    }

    #[test]
    fn test_extract_canonical_name_uses_first_match() {
        let doc = Document::parse(
            r#"<div class="name">Atta cephalotes</div><div class="name">Atta sexdens</div>"#,
        );
        assert_eq!(extract_canonical_name(&doc), "Atta cephalotes");
    }

    #[test]
    fn test_extract_canonical_name_includes_nested_text() {
        let doc = Document::parse(r#"<div class="name"><i>Atta</i> <i>cephalotes</i></div>"#);
        assert_eq!(extract_canonical_name(&doc), "Atta cephalotes");
    }

    #[test]
    fn test_extract_canonical_name_missing_is_empty() {
        let doc = Document::parse("<html><body><p>No results</p></body></html>");
        assert_eq!(extract_canonical_name(&doc), "");
    }

    #[test]
    fn test_extract_canonical_name_ignores_other_tags_with_class() {
        let doc = Document::parse(r#"<span class="name">Atta cephalotes</span>"#);
        assert_eq!(extract_canonical_name(&doc), "");
    }
}
