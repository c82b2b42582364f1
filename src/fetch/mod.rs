//! HTML fetcher: parameterized GET returning a queryable document.
//!
//! Every call issues exactly one request; nothing is cached. Transport
//! failures and non-success statuses propagate as [`FetchError`].
//!
//! # Example
//!
//! ```no_run
//! use antweb_core::{HtmlFetcher, ScraperConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScraperConfig::default();
//! let fetcher = HtmlFetcher::new(&config)?;
//! let doc = fetcher
//!     .fetch(&config.images_url(), &[("genus", "Atta"), ("species", "cephalotes")])
//!     .await?;
//! let name = doc.find("div", "class", "name").map(|div| div.text());
//! println!("{name:?}");
//! # Ok(())
//! # }
//! ```

mod document;
mod error;

pub use document::{Document, Element};
pub use error::FetchError;

use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ScraperConfig;
use crate::http::build_http_client;

/// Fetches HTML pages and parses them into [`Document`]s.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HtmlFetcher {
    client: Client,
}

impl HtmlFetcher {
    /// Creates a fetcher using the page timeouts from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let client = build_http_client(
            "fetcher",
            config.connect_timeout_secs,
            config.read_timeout_secs,
        )
        .map_err(|failure| FetchError::client_build(failure.to_string()))?;
        Ok(Self { client })
    }

    /// Issues a GET against `endpoint` with `params` as the query string and
    /// parses the body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the URL cannot be built, the request fails,
    /// the server answers with a non-success status, or the body cannot be read.
    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Document, FetchError> {
        let url = Url::parse_with_params(endpoint, params)
            .map_err(|_| FetchError::invalid_url(endpoint))?;
        debug!(url = %url, "fetching page");

        let response = self
            .client
            .get(url.clone())
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| FetchError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url.as_str(), status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(url.as_str(), e))?;
        debug!(bytes = body.len(), "page received");

        Ok(Document::parse(&body))
    }
}
