//! Stub collaborators shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use backdrop_core::common::errors::{ImageLoadError, ManifestError, StorageError};
use backdrop_core::manifest::{BackgroundPaths, ImageManifest, ManifestSource};
use backdrop_core::preload::ImageLoader;
use backdrop_core::selection::{MemoryStore, SelectionStore};
use backdrop_core::{
    BackgroundController, Collaborators, ControllerSettings, MemoryDocument, ThemeVariant,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Manifest source answering from a fixed table keyed by manifest URL.
pub struct StubManifests {
    responses: HashMap<String, Result<ImageManifest, ManifestError>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubManifests {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn url(variant: ThemeVariant) -> String {
        BackgroundPaths::new("").manifest_url(variant)
    }

    pub fn with_images(mut self, variant: ThemeVariant, images: &[&str]) -> Self {
        self.responses.insert(
            Self::url(variant),
            Ok(ImageManifest {
                images: images.iter().map(|image| image.to_string()).collect(),
                last_updated: None,
            }),
        );
        self
    }

    pub fn with_status(mut self, variant: ThemeVariant, status: u16) -> Self {
        let url = Self::url(variant);
        self.responses
            .insert(url.clone(), Err(ManifestError::Status { url, status }));
        self
    }

    pub fn with_body(mut self, variant: ThemeVariant, body: &str) -> Self {
        let url = Self::url(variant);
        let parsed = ImageManifest::parse(&url, body.as_bytes());
        self.responses.insert(url, parsed);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ManifestSource for StubManifests {
    async fn fetch(&self, url: &str) -> Result<ImageManifest, ManifestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(ManifestError::Request {
                    url: url.to_string(),
                    reason: "connection refused".to_string(),
                })
            })
    }
}

/// Image loader counting loads per URL.
#[derive(Default)]
pub struct CountingLoader {
    loads: Mutex<HashMap<String, usize>>,
    broken: HashSet<String>,
    delay: Duration,
}

impl CountingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_broken(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn loads(&self, url: &str) -> usize {
        self.loads
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_loads(&self) -> usize {
        self.loads.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl ImageLoader for CountingLoader {
    async fn load(&self, url: &str) -> Result<(), ImageLoadError> {
        *self.loads.lock().unwrap().entry(url.to_string()).or_default() += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.broken.contains(url) {
            return Err(ImageLoadError::Status {
                url: url.to_string(),
                status: 404,
            });
        }
        Ok(())
    }
}

/// Store whose every operation fails, like storage disabled by the browser.
pub struct UnavailableStore;

impl SelectionStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable {
            reason: "storage disabled".to_string(),
        })
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable {
            reason: "storage disabled".to_string(),
        })
    }
}

/// Store that reads fine but rejects every write, like storage over quota.
pub struct ReadOnlyStore {
    inner: MemoryStore,
}

impl ReadOnlyStore {
    pub fn with_entry(key: &str, value: &str) -> Self {
        Self {
            inner: MemoryStore::with_entries([(key, value)]),
        }
    }
}

impl SelectionStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable {
            reason: "quota exceeded".to_string(),
        })
    }
}

/// Everything a controller test needs to inspect afterwards.
pub struct Harness {
    pub document: Arc<MemoryDocument>,
    pub manifests: Arc<StubManifests>,
    pub loader: Arc<CountingLoader>,
    pub store: Arc<dyn SelectionStore>,
    pub controller: Arc<BackgroundController>,
}

pub fn harness(manifests: StubManifests) -> Harness {
    harness_with(manifests, Arc::new(MemoryStore::new()), CountingLoader::new())
}

pub fn harness_with(
    manifests: StubManifests,
    store: Arc<dyn SelectionStore>,
    loader: CountingLoader,
) -> Harness {
    let document = Arc::new(MemoryDocument::new());
    let manifests = Arc::new(manifests);
    let loader = Arc::new(loader);

    let controller = BackgroundController::new(
        Collaborators {
            document: document.clone(),
            manifests: manifests.clone(),
            images: loader.clone(),
            store: store.clone(),
        },
        ControllerSettings {
            rng_seed: Some(42),
            ..ControllerSettings::default()
        },
    )
    .expect("default timings are valid");

    Harness {
        document,
        manifests,
        loader,
        store,
        controller: Arc::new(controller),
    }
}

pub fn light(name: &str) -> String {
    format!("/backgrounds/light/{name}")
}

pub fn dark(name: &str) -> String {
    format!("/backgrounds/dark/{name}")
}
