use super::{BackgroundPaths, ImageSets, ManifestSource};
use crate::preload::PreloadCache;
use crate::theme::ThemeVariant;
use std::sync::Arc;

/// Loads both variant manifests and turns them into image lists.
///
/// Loading never fails. Each variant is handled on its own: a broken dark
/// manifest leaves the light list untouched and vice versa.
pub struct ManifestLoader {
    source: Arc<dyn ManifestSource>,
    paths: BackgroundPaths,
    preload: Arc<PreloadCache>,
}

impl ManifestLoader {
    pub fn new(
        source: Arc<dyn ManifestSource>,
        paths: BackgroundPaths,
        preload: Arc<PreloadCache>,
    ) -> Self {
        Self {
            source,
            paths,
            preload,
        }
    }

    pub fn paths(&self) -> &BackgroundPaths {
        &self.paths
    }

    /// Fetches both manifests and starts warming the first image of each
    /// list in the background.
    pub async fn load_manifests(&self) -> ImageSets {
        let (light, dark) = tokio::join!(
            self.load_variant(ThemeVariant::Light),
            self.load_variant(ThemeVariant::Dark)
        );

        let sets = ImageSets { light, dark };
        self.warm_up(&sets);
        sets
    }

    async fn load_variant(&self, variant: ThemeVariant) -> Vec<String> {
        let url = self.paths.manifest_url(variant);

        match self.source.fetch(&url).await {
            Ok(manifest) => {
                log::debug!(
                    "Loaded {} {variant} background(s) from {url} (last updated: {:?})",
                    manifest.images.len(),
                    manifest.last_updated
                );
                manifest
                    .images
                    .iter()
                    .map(|filename| self.paths.resolve(variant, filename))
                    .collect()
            }
            Err(e) => {
                log::warn!("Could not load {variant} background index, using fallback image: {e}");
                vec![BackgroundPaths::fallback(variant).to_string()]
            }
        }
    }

    // Best effort: the outcome stays in the cache, failures are only logged.
    fn warm_up(&self, sets: &ImageSets) {
        for variant in ThemeVariant::ALL {
            let Some(first) = sets.get(variant).first() else {
                continue;
            };

            let cache = Arc::clone(&self.preload);
            let url = first.clone();
            tokio::spawn(async move {
                if let Err(e) = cache.preload(&url).await {
                    log::debug!("Warm-up preload failed: {e}");
                }
            });
        }
    }
}
