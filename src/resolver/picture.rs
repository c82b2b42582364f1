//! Author and picture URL lookups against the picture endpoint.
//!
//! Both lookups read the `span#photo_metadata` list on the picture page. The
//! picture URL falls back to the `div.big_picture` image only when that list
//! is missing entirely; a list without a matching item yields `""`.

use tracing::{debug, instrument};

use crate::fetch::{Document, Element, FetchError, HtmlFetcher};

use super::PictureQuery;

const PHOTOGRAPHER_PREFIX: &str = "Photographer: ";
const HIGHEST_RESOLUTION_PREFIX: &str = "View Highest Resolution";

/// Photographer credited for a specimen picture.
///
/// Both fields are empty when the page carries no attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Profile URL.
    pub url: String,
}

impl Author {
    /// Creates an author record.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Returns true when no attribution was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.url.is_empty()
    }
}

/// Resolves a canonical name into picture attribution and image URL.
///
/// Each method fetches the picture page on its own; results are not shared
/// between calls.
#[derive(Debug, Clone)]
pub struct PictureResolver {
    fetcher: HtmlFetcher,
    endpoint: String,
}

impl PictureResolver {
    /// Creates a resolver querying `endpoint` (the full picture URL).
    #[must_use]
    pub fn new(fetcher: HtmlFetcher, endpoint: impl Into<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
        }
    }

    /// Returns the photographer credited on the picture page for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the page cannot be retrieved.
    #[instrument(skip(self))]
    pub async fn resolve_author(&self, name: &str) -> Result<Author, FetchError> {
        let doc = self.fetch_page(name).await?;
        Ok(extract_author(&doc))
    }

    /// Returns the best available full-resolution image URL for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the page cannot be retrieved.
    #[instrument(skip(self))]
    pub async fn resolve_picture_url(&self, name: &str) -> Result<String, FetchError> {
        let doc = self.fetch_page(name).await?;
        Ok(extract_picture_url(&doc))
    }

    async fn fetch_page(&self, name: &str) -> Result<Document, FetchError> {
        let query = PictureQuery::new(name);
        self.fetcher.fetch(&self.endpoint, &query.params()).await
    }
}

/// Reads the photographer from the metadata list.
///
/// The matched item's text has exactly the `"Photographer: "` prefix removed;
/// the URL is the `href` of the item's first link. If several items match,
/// the last one wins.
#[must_use]
pub fn extract_author(doc: &Document) -> Author {
    let Some(items) = metadata_items(doc) else {
        debug!("picture page has no metadata list");
        return Author::default();
    };

    let mut author = Author::default();
    for item in items {
        let text = item.text();
        if let Some(name) = text.strip_prefix(PHOTOGRAPHER_PREFIX) {
            author = Author::new(name, link_href(item));
        }
    }
    author
}

/// Reads the highest resolution link from the metadata list, falling back to
/// the big picture image when the list is absent.
#[must_use]
pub fn extract_picture_url(doc: &Document) -> String {
    let Some(items) = metadata_items(doc) else {
        debug!("picture page has no metadata list; using big picture fallback");
        return picture_url_fallback(doc);
    };

    let mut url = String::new();
    for item in items {
        if item.text().starts_with(HIGHEST_RESOLUTION_PREFIX) {
            url = link_href(item);
        }
    }
    url
}

/// `src` of the image inside `div.big_picture`, or `""` if either is missing.
#[must_use]
pub fn picture_url_fallback(doc: &Document) -> String {
    doc.find("div", "class", "big_picture")
        .and_then(|div| div.first("img"))
        .and_then(|img| img.attr("src"))
        .unwrap_or_default()
        .to_string()
}

fn metadata_items(doc: &Document) -> Option<Vec<Element<'_>>> {
    doc.find("span", "id", "photo_metadata")
        .map(|span| span.find_all("li"))
}

fn link_href(item: Element<'_>) -> String {
    item.first("a")
        .and_then(|link| link.attr("href"))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picture_page(items: &str) -> String {
        format!(
            r#"<html><body>
                 <div class="big_picture"><img src="http://example.org/fallback.jpg"></div>
                 <span id="photo_metadata"><ul>{items}</ul></span>
               </body></html>"#
        )
    }

    #[test]
    fn test_extract_author_strips_prefix_only() {
        let doc = Document::parse(&picture_page(
            r#"<li>Photographer: <a href="http://example.org/jane">Jane Doe</a></li>"#,
        ));
        assert_eq!(
            extract_author(&doc),
            Author::new("Jane Doe", "http://example.org/jane")
        );
    }

    #[test]
    fn test_extract_author_keeps_trailing_text_verbatim() {
        let doc = Document::parse(&picture_page(
            r#"<li>Photographer: <a href="/p/7">April Nobile </a>(CAS)</li>"#,
        ));
        let author = extract_author(&doc);
        assert_eq!(author.name, "April Nobile (CAS)");
        assert_eq!(author.url, "/p/7");
    }

    #[test]
    fn test_extract_author_requires_prefix_at_start() {
        let doc = Document::parse(&picture_page(
            r#"<li>Lead Photographer: <a href="http://example.org/x">X</a></li>"#,
        ));
        assert!(extract_author(&doc).is_empty());
    }

    #[test]
    fn test_extract_author_without_list_is_empty() {
        let doc = Document::parse("<html><body><p>nothing</p></body></html>");
        assert_eq!(extract_author(&doc), Author::default());
    }

    #[test]
    fn test_extract_author_without_link_has_empty_url() {
        let doc = Document::parse(&picture_page("<li>Photographer: Jane Doe</li>"));
        assert_eq!(extract_author(&doc), Author::new("Jane Doe", ""));
    }

    #[test]
    fn test_extract_author_last_match_wins() {
        let doc = Document::parse(&picture_page(
            r#"<li>Photographer: <a href="/a">A</a></li>
               <li>Photographer: <a href="/b">B</a></li>"#,
        ));
        assert_eq!(extract_author(&doc), Author::new("B", "/b"));
    }

    #[test]
    fn test_extract_picture_url_prefers_highest_resolution() {
        let doc = Document::parse(&picture_page(
            r#"<li>Photographer: <a href="/jane">Jane Doe</a></li>
               <li>View Highest Resolution <a href="http://example.org/full.tif">(tif)</a></li>"#,
        ));
        assert_eq!(extract_picture_url(&doc), "http://example.org/full.tif");
    }

    #[test]
    fn test_extract_picture_url_list_without_match_does_not_fall_back() {
        let doc = Document::parse(&picture_page(
            r#"<li>Photographer: <a href="/jane">Jane Doe</a></li>"#,
        ));
        assert_eq!(extract_picture_url(&doc), "");
    }

    #[test]
    fn test_extract_picture_url_falls_back_when_list_absent() {
        let doc = Document::parse(
            r#"<div class="big_picture"><img src="http://example.org/full.jpg"></div>"#,
        );
        assert_eq!(extract_picture_url(&doc), "http://example.org/full.jpg");
    }

    #[test]
    fn test_extract_picture_url_empty_when_nothing_present() {
        let doc = Document::parse("<html><body></body></html>");
        assert_eq!(extract_picture_url(&doc), "");
    }

    #[test]
    fn test_picture_url_fallback_without_img_is_empty() {
        let doc = Document::parse(r#"<div class="big_picture"><p>no image</p></div>"#);
        assert_eq!(picture_url_fallback(&doc), "");
    }
}
