//! The background controller: one value per page context owning every
//! piece of state the triggers share.
//!
//! Triggers and what they run:
//!
//! - first `DomReady`/`PageLoad`: overlay, manifests, restore-or-pick,
//!   overlay removal (guarded, at most one at a time)
//! - `ThemeChanged`: restore-or-pick for the new variant, no overlay
//! - `ChangeRequested`: forced random pick with the overlay shown
//! - later `PageLoad`s: instant re-write of the last known background
//!
//! Theme changes and manual requests are not serialized against each other.
//! Two transitions on one variant may interleave; the later style write wins.

pub mod events;
pub mod guard;

pub use events::{EventOutcome, PageEvent};
pub use guard::{LoadingFlag, LoadingGuard};

use crate::applier::{BackgroundApplier, MANAGED_STYLE_ID, TimingsError, TransitionTimings};
use crate::document::Document;
use crate::manifest::{BackgroundPaths, ImageSets, ManifestLoader, ManifestSource};
use crate::overlay::{BootstrapOverlay, OverlaySettings};
use crate::preload::{ImageLoader, PreloadCache};
use crate::selection::{Resolution, SelectionPolicy, SelectionStore};
use crate::theme::ThemeVariant;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Host collaborators the controller talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub document: Arc<dyn Document>,
    pub manifests: Arc<dyn ManifestSource>,
    pub images: Arc<dyn ImageLoader>,
    pub store: Arc<dyn SelectionStore>,
}

/// Tunables of one controller.
#[derive(Debug, Clone, Default)]
pub struct ControllerSettings {
    /// Storage domain the images are served from; empty for root-relative
    /// paths.
    pub domain: String,
    pub transition: TransitionTimings,
    pub overlay: OverlaySettings,
    /// Fixed seed for the random pick, for reproducible runs.
    pub rng_seed: Option<u64>,
}

pub struct BackgroundController {
    document: Arc<dyn Document>,
    manifests: ManifestLoader,
    preload: Arc<PreloadCache>,
    applier: BackgroundApplier,
    policy: SelectionPolicy,
    overlay: BootstrapOverlay,
    images: RwLock<ImageSets>,
    loading: LoadingFlag,
    bootstrapped: AtomicBool,
    last_applied: Mutex<HashMap<ThemeVariant, String>>,
}

impl BackgroundController {
    pub fn new(
        collaborators: Collaborators,
        settings: ControllerSettings,
    ) -> Result<Self, TimingsError> {
        settings.transition.validate()?;

        let Collaborators {
            document,
            manifests,
            images,
            store,
        } = collaborators;

        let preload = Arc::new(PreloadCache::new(images));
        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            manifests: ManifestLoader::new(
                manifests,
                BackgroundPaths::new(&settings.domain),
                Arc::clone(&preload),
            ),
            applier: BackgroundApplier::new(
                Arc::clone(&document),
                Arc::clone(&preload),
                settings.transition,
            ),
            policy: SelectionPolicy::with_rng(store, rng),
            overlay: BootstrapOverlay::new(Arc::clone(&document), settings.overlay),
            document,
            preload,
            images: RwLock::new(ImageSets::default()),
            loading: LoadingFlag::new(),
            bootstrapped: AtomicBool::new(false),
            last_applied: Mutex::new(HashMap::new()),
        })
    }

    /// Routes a host signal to the matching operation.
    pub async fn handle(&self, event: PageEvent) -> EventOutcome {
        log::debug!("Handling {event}");

        match event {
            PageEvent::DomReady | PageEvent::PageLoad if !self.is_bootstrapped() => {
                self.bootstrap().await
            }
            PageEvent::DomReady => EventOutcome::Dropped,
            PageEvent::PageLoad => EventOutcome::Reapplied(self.soft_navigation()),
            PageEvent::BeforeSwap => EventOutcome::Carried(self.before_swap()),
            PageEvent::ThemeChanged => EventOutcome::Resolved(self.on_theme_changed().await),
            PageEvent::ChangeRequested => EventOutcome::Resolved(self.change_background().await),
        }
    }

    /// Full page-load sequence: overlay, manifests, restore-or-pick,
    /// overlay removal. Dropped when another bootstrap is running.
    pub async fn bootstrap(&self) -> EventOutcome {
        let Some(_guard) = self.loading.try_acquire() else {
            log::debug!("Bootstrap already in progress, dropping trigger");
            return EventOutcome::Dropped;
        };

        self.overlay.show();

        let sets = self.manifests.load_manifests().await;
        if let Ok(mut images) = self.images.write() {
            *images = sets;
        }

        let variant = self.document.theme_variant();
        let resolution = self.resolve(variant, false, true).await;
        self.bootstrapped.store(true, Ordering::Release);

        log::info!("Background bootstrap finished: {resolution:?}");
        EventOutcome::Bootstrapped(resolution)
    }

    /// Restores the stored choice for `variant` unless `force_random`, and
    /// otherwise picks and persists a random image. `is_initial_load` wraps
    /// the call in the bootstrap overlay.
    pub async fn resolve(
        &self,
        variant: ThemeVariant,
        force_random: bool,
        is_initial_load: bool,
    ) -> Resolution {
        if is_initial_load {
            self.overlay.show();
        }

        let images = self.images(variant);
        let resolution = self.policy.decide(variant, &images, force_random);

        match &resolution {
            Resolution::Restored(url) => self.apply(url, variant).await,
            Resolution::Picked(url) => {
                self.policy.remember(variant, url);
                self.apply(url, variant).await;
            }
            Resolution::Empty => {
                log::debug!("No {variant} backgrounds available, leaving the page as is");
            }
        }

        if is_initial_load {
            self.overlay.hide().await;
        }
        resolution
    }

    /// Theme toggle: restore-or-pick for the variant now on the page.
    pub async fn on_theme_changed(&self) -> Resolution {
        let variant = self.document.theme_variant();
        self.resolve(variant, false, false).await
    }

    /// Manual request: a fresh random image behind the overlay.
    pub async fn change_background(&self) -> Resolution {
        self.overlay.show();
        let variant = self.document.theme_variant();
        let resolution = self.resolve(variant, true, false).await;
        self.overlay.hide().await;
        resolution
    }

    /// The managed rule to carry into the incoming page.
    pub fn before_swap(&self) -> Option<String> {
        self.document.style_rule(MANAGED_STYLE_ID)
    }

    /// Re-writes the last known background for the current variant, without
    /// selecting or animating.
    pub fn soft_navigation(&self) -> Option<String> {
        let variant = self.document.theme_variant();
        let url = self
            .last_applied(variant)
            .or_else(|| self.policy.stored(variant))?;

        self.applier.reapply(&url, variant);
        log::debug!("Reapplied {variant} background {url} after navigation");
        Some(url)
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.load(Ordering::Acquire)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Image list currently known for `variant`.
    pub fn images(&self, variant: ThemeVariant) -> Vec<String> {
        self.images
            .read()
            .map(|sets| sets.get(variant).to_vec())
            .unwrap_or_default()
    }

    pub fn image_sets(&self) -> ImageSets {
        self.images
            .read()
            .map(|sets| sets.clone())
            .unwrap_or_default()
    }

    pub fn last_applied(&self, variant: ThemeVariant) -> Option<String> {
        self.last_applied
            .lock()
            .ok()
            .and_then(|applied| applied.get(&variant).cloned())
    }

    pub fn preload_cache(&self) -> &PreloadCache {
        &self.preload
    }

    pub fn current_rule(&self) -> Option<String> {
        self.applier.current_rule()
    }

    async fn apply(&self, url: &str, variant: ThemeVariant) {
        if let Ok(mut applied) = self.last_applied.lock() {
            applied.insert(variant, url.to_string());
        }
        self.applier.apply(url, variant).await;
    }
}
