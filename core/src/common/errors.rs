use thiserror::Error;

/// Errors raised while fetching or decoding a background manifest.
///
/// None of these ever reach the page: the manifest loader catches every
/// variant at its boundary, logs it and substitutes the hardcoded fallback
/// image for the affected theme variant.
///
/// # Error Categories
///
/// ## Network Failures
/// - [`Request`] - The request could not be sent or the connection dropped
/// - [`Status`] - The server answered with a non-2xx status
///
/// ## Parse Failures
/// - [`Parse`] - The body was not a valid manifest document
///
/// # Examples
///
/// ```no_run
/// use backdrop_core::common::errors::ManifestError;
///
/// fn describe(error: &ManifestError) -> &'static str {
///     if error.is_network_failure() {
///         "manifest unreachable"
///     } else {
///         "manifest malformed"
///     }
/// }
/// ```
///
/// [`Request`]: ManifestError::Request
/// [`Status`]: ManifestError::Status
/// [`Parse`]: ManifestError::Parse
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManifestError {
    /// The manifest request never produced a response.
    #[error("Manifest request failed: {url} - {reason}")]
    Request { url: String, reason: String },

    /// The manifest endpoint answered with a non-success status.
    #[error("Manifest request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read as a manifest.
    #[error("Malformed manifest at {url}: {reason}")]
    Parse { url: String, reason: String },
}

impl ManifestError {
    /// Returns `true` for the network half of the taxonomy (request and
    /// status failures), `false` for malformed bodies.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, Self::Request { .. } | Self::Status { .. })
    }

    /// URL of the manifest that failed.
    pub fn url(&self) -> &str {
        match self {
            Self::Request { url, .. } | Self::Status { url, .. } | Self::Parse { url, .. } => url,
        }
    }
}

/// Errors raised while preloading an image.
///
/// Preload outcomes are shared between every caller waiting on the same URL,
/// which is why this type is `Clone`. The background applier logs these and
/// carries on with the swap.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageLoadError {
    /// The image request never produced a response.
    #[error("Image request failed: {url} - {reason}")]
    Request { url: String, reason: String },

    /// The image endpoint answered with a non-success status.
    #[error("Image request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The bytes arrived but are not an image the renderer can decode.
    #[error("Image at {url} is not decodable: {reason}")]
    Undecodable { url: String, reason: String },
}

impl ImageLoadError {
    /// URL of the image that failed.
    pub fn url(&self) -> &str {
        match self {
            Self::Request { url, .. }
            | Self::Status { url, .. }
            | Self::Undecodable { url, .. } => url,
        }
    }
}

/// Errors raised by durable selection storage.
///
/// Storage is treated as recoverable: when it fails the selection policy
/// keeps the choice in memory for the rest of the session.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store cannot be read or written at all.
    #[error("Selection storage unavailable: {reason}")]
    Unavailable { reason: String },

    /// The store exists but its contents could not be decoded.
    #[error("Selection storage is corrupt: {reason}")]
    Corrupt { reason: String },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Unavailable {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Corrupt {
            reason: err.to_string(),
        }
    }
}
