//! Background manifests and the image lists built from them.
//!
//! Each theme variant has its own `index.json` listing image filenames. The
//! [`ManifestLoader`] fetches both through a [`ManifestSource`], joins the
//! filenames to the variant's base path and falls back to a single bundled
//! image when a manifest cannot be used.

pub mod http;
pub mod loader;

pub use http::HttpManifestSource;
pub use loader::ManifestLoader;

use crate::common::errors::ManifestError;
use crate::theme::ThemeVariant;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Bundled image used when the light manifest is unavailable.
pub const LIGHT_FALLBACK_IMAGE: &str =
    "/images/backgrounds/light/carolinie-cavalli-Qw3w0oBH63s-unsplash.jpg";

/// Bundled image used when the dark manifest is unavailable.
pub const DARK_FALLBACK_IMAGE: &str =
    "/images/backgrounds/dark/bence-halmosi-tOJlSyyOtPU-unsplash.jpg";

/// Manifest document as published next to the images.
///
/// Duplicate and empty image lists are both valid; an empty list simply
/// means no background change for that variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageManifest {
    pub images: Vec<String>,
    #[serde(
        rename = "lastUpdated",
        default,
        deserialize_with = "lenient_timestamp"
    )]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ImageManifest {
    /// Parses a manifest body fetched from `url`.
    pub fn parse(url: &str, body: &[u8]) -> Result<Self, ManifestError> {
        serde_json::from_slice(body).map_err(|e| ManifestError::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

// A missing or odd timestamp never invalidates the image list.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc)))
}

/// Where manifests come from.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetches and parses the manifest at `url`.
    async fn fetch(&self, url: &str) -> Result<ImageManifest, ManifestError>;
}

/// Resolved image URLs for both variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageSets {
    pub light: Vec<String>,
    pub dark: Vec<String>,
}

impl ImageSets {
    pub fn get(&self, variant: ThemeVariant) -> &[String] {
        match variant {
            ThemeVariant::Light => &self.light,
            ThemeVariant::Dark => &self.dark,
        }
    }

    pub fn set(&mut self, variant: ThemeVariant, images: Vec<String>) {
        match variant {
            ThemeVariant::Light => self.light = images,
            ThemeVariant::Dark => self.dark = images,
        }
    }
}

/// Builds manifest and image URLs from the injected storage domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundPaths {
    root: String,
}

impl BackgroundPaths {
    /// `domain` may be a bare host (`images.example.com`), a full origin
    /// (`https://images.example.com`) or empty for root-relative paths.
    pub fn new(domain: &str) -> Self {
        let domain = domain.trim().trim_end_matches('/');
        let root = if domain.is_empty() {
            String::new()
        } else if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        };
        Self { root }
    }

    /// Base path of a variant's images, always ending in `/`.
    pub fn variant_base(&self, variant: ThemeVariant) -> String {
        format!("{}/backgrounds/{}/", self.root, variant.as_str())
    }

    pub fn manifest_url(&self, variant: ThemeVariant) -> String {
        format!("{}index.json", self.variant_base(variant))
    }

    /// Joins a manifest filename to the variant base path.
    pub fn resolve(&self, variant: ThemeVariant, filename: &str) -> String {
        format!(
            "{}{}",
            self.variant_base(variant),
            filename.trim_start_matches('/')
        )
    }

    pub fn fallback(variant: ThemeVariant) -> &'static str {
        match variant {
            ThemeVariant::Light => LIGHT_FALLBACK_IMAGE,
            ThemeVariant::Dark => DARK_FALLBACK_IMAGE,
        }
    }
}
