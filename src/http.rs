//! Shared HTTP client construction policy.
//!
//! Both the page fetcher and the image downloader build their clients here so
//! timeouts, user-agent, compression and proxy handling stay consistent.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use tracing::warn;

use crate::user_agent;

/// Why a client could not be built.
#[derive(Debug)]
pub(crate) enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

impl std::fmt::Display for BuildClientFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Panic => write!(f, "client builder panicked while reading proxy settings"),
            Self::Build(error) => write!(f, "{error}"),
        }
    }
}

/// Builds a client with the given timeouts.
///
/// Some sandboxed environments panic when the system proxy configuration is
/// queried. On panic the builder is retried with system proxy lookup disabled
/// and proxies taken from the environment only.
pub(crate) fn build_http_client(
    role: &str,
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
) -> Result<Client, BuildClientFailure> {
    match try_build_client(connect_timeout_secs, read_timeout_secs, false) {
        Err(BuildClientFailure::Panic) => {
            warn!(
                role,
                "HTTP client hit system proxy panic; using env-proxy fallback builder"
            );
            try_build_client(connect_timeout_secs, read_timeout_secs, true)
        }
        other => other,
    }
}

fn try_build_client(
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder(connect_timeout_secs, read_timeout_secs);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder(connect_timeout_secs: u64, read_timeout_secs: u64) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = env_proxy_for_scheme("https")
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = env_proxy_for_scheme("http")
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn env_proxy_for_scheme(scheme: &str) -> Option<String> {
    match scheme {
        "https" => find_first_proxy_var(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]),
        "http" => find_first_proxy_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]),
        _ => None,
    }
}

fn find_first_proxy_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_proxy_for_unknown_scheme_is_none() {
        assert!(env_proxy_for_scheme("ftp").is_none());
    }

    #[test]
    fn test_find_first_proxy_var_skips_missing_names() {
        assert!(find_first_proxy_var(&["ANTWEB_SCRAPER_TEST_UNSET_PROXY_VAR"]).is_none());
    }

    #[test]
    fn test_build_http_client_with_defaults() {
        let client = build_http_client("test", 10, 30);
        assert!(client.is_ok(), "client should build: {:?}", client.err());
    }
}
