//! Small helpers shared by the HTTP manifest source and image loader.

use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;

/// Builds the HTTP client used for manifests and image preloads.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, image/*;q=0.9, */*;q=0.5"),
    );

    reqwest::Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
}

/// Turns a manifest or image URL into an absolute one.
///
/// Root-relative paths (produced when no storage domain is configured) are
/// joined to `origin`; without an origin they cannot be requested.
pub fn absolute_url(origin: Option<&Url>, url: &str) -> Result<Url, String> {
    if let Ok(parsed) = Url::parse(url) {
        return Ok(parsed);
    }
    match origin {
        Some(origin) => origin.join(url).map_err(|e| e.to_string()),
        None => Err(format!(
            "relative URL '{url}' needs a site origin to be requested"
        )),
    }
}
