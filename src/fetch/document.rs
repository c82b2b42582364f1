//! Minimal query surface over a parsed HTML page.
//!
//! Exposes exactly the lookups the resolvers need: first element by tag and
//! attribute equality, and all descendant elements by tag. The `class`
//! attribute matches on any of its whitespace-separated tokens.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// A parsed HTML document.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document. Malformed markup is repaired, never rejected.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Returns the first element named `tag` whose `attr` equals `value`.
    #[must_use]
    pub fn find(&self, tag: &str, attr: &str, value: &str) -> Option<Element<'_>> {
        let selector = tag_selector(tag)?;
        self.html
            .select(&selector)
            .find(|element| attr_matches(*element, attr, value))
            .map(Element::new)
    }

    /// Returns every element named `tag`, in document order.
    #[must_use]
    pub fn find_all(&self, tag: &str) -> Vec<Element<'_>> {
        let Some(selector) = tag_selector(tag) else {
            return Vec::new();
        };
        self.html.select(&selector).map(Element::new).collect()
    }
}

/// A borrowed element inside a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    inner: ElementRef<'a>,
}

impl<'a> Element<'a> {
    fn new(inner: ElementRef<'a>) -> Self {
        Self { inner }
    }

    /// Concatenated text of this element and all of its descendants.
    #[must_use]
    pub fn text(&self) -> String {
        self.inner.text().collect()
    }

    /// Value of the named attribute, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.inner.value().attr(name)
    }

    /// First descendant named `tag`.
    #[must_use]
    pub fn first(&self, tag: &str) -> Option<Element<'a>> {
        let selector = tag_selector(tag)?;
        self.inner.select(&selector).next().map(Element::new)
    }

    /// Every descendant named `tag`, in document order.
    #[must_use]
    pub fn find_all(&self, tag: &str) -> Vec<Element<'a>> {
        let Some(selector) = tag_selector(tag) else {
            return Vec::new();
        };
        self.inner.select(&selector).map(Element::new).collect()
    }
}

fn attr_matches(element: ElementRef<'_>, attr: &str, value: &str) -> bool {
    let node = element.value();
    if attr.eq_ignore_ascii_case("class") {
        return node.classes().any(|class| class == value);
    }
    node.attr(attr) == Some(value)
}

fn tag_selector(tag: &str) -> Option<Selector> {
    match Selector::parse(tag) {
        Ok(selector) => Some(selector),
        Err(error) => {
            warn!(tag, error = %error, "Invalid tag selector; treating as no match");
            None
        }
    }
}
