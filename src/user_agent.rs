//! Shared User-Agent string for page and image HTTP clients.

/// Default User-Agent for all requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("antweb-scraper/{version} (specimen-image-tool)")
}
