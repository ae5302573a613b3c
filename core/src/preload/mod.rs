//! Memoized off-document image loading.
//!
//! Every URL gets exactly one underlying load for the lifetime of the cache.
//! Callers arriving while that load is in flight, or after it settled, share
//! its outcome. Entries are never evicted: the image set of one page session
//! is bounded by the manifests.

pub mod http;

pub use http::HttpImageLoader;

use crate::common::errors::ImageLoadError;
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Loads an image so that it is decodable before it is displayed.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<(), ImageLoadError>;
}

type PreloadHandle = Shared<BoxFuture<'static, Result<(), ImageLoadError>>>;

/// Per-URL cache of pending and settled preloads.
pub struct PreloadCache {
    loader: Arc<dyn ImageLoader>,
    entries: Mutex<HashMap<String, PreloadHandle>>,
}

impl PreloadCache {
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            loader,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves once `url` is decodable, or with the error of its one load.
    pub async fn preload(&self, url: &str) -> Result<(), ImageLoadError> {
        let handle = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries
                .entry(url.to_string())
                .or_insert_with(|| {
                    log::debug!("Preloading background image {url}");
                    let loader = Arc::clone(&self.loader);
                    let url = url.to_string();
                    async move { loader.load(&url).await }.boxed().shared()
                })
                .clone()
        };

        handle.await
    }

    /// Whether a load for `url` has been started.
    pub fn contains(&self, url: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(url))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
