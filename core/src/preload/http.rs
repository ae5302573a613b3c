use super::ImageLoader;
use crate::common::errors::ImageLoadError;
use crate::common::http::absolute_url;
use async_trait::async_trait;
use reqwest::Url;

/// Downloads images and checks that the bytes are in a known image format.
pub struct HttpImageLoader {
    http_client: reqwest::Client,
    origin: Option<Url>,
}

impl HttpImageLoader {
    pub fn new(http_client: reqwest::Client, origin: Option<Url>) -> Self {
        Self {
            http_client,
            origin,
        }
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> Result<(), ImageLoadError> {
        let target =
            absolute_url(self.origin.as_ref(), url).map_err(|reason| ImageLoadError::Request {
                url: url.to_string(),
                reason,
            })?;

        let response = self
            .http_client
            .get(target)
            .send()
            .await
            .map_err(|e| ImageLoadError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageLoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageLoadError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let format = image::guess_format(&bytes).map_err(|e| ImageLoadError::Undecodable {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        log::debug!("Preloaded {url} ({format:?}, {} bytes)", bytes.len());
        Ok(())
    }
}
