use super::{ImageManifest, ManifestSource};
use crate::common::errors::ManifestError;
use crate::common::http::absolute_url;
use async_trait::async_trait;
use reqwest::Url;

/// Fetches manifests over HTTP.
pub struct HttpManifestSource {
    http_client: reqwest::Client,
    origin: Option<Url>,
}

impl HttpManifestSource {
    /// `origin` is the site root used for root-relative manifest paths.
    pub fn new(http_client: reqwest::Client, origin: Option<Url>) -> Self {
        Self {
            http_client,
            origin,
        }
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch(&self, url: &str) -> Result<ImageManifest, ManifestError> {
        let target =
            absolute_url(self.origin.as_ref(), url).map_err(|reason| ManifestError::Request {
                url: url.to_string(),
                reason,
            })?;

        log::debug!("Fetching background manifest from {target}");

        let response = self
            .http_client
            .get(target)
            .send()
            .await
            .map_err(|e| ManifestError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManifestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ManifestError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        ImageManifest::parse(url, &body)
    }
}
