//! Which background to show, and remembering it.
//!
//! The policy restores the stored choice for a variant unless a new image is
//! explicitly requested, and otherwise draws uniformly from the variant's
//! list. A random pick is persisted so later page loads stay stable until
//! the visitor asks for another image.

pub mod store;

pub use store::{FileStore, MemoryStore, SelectionStore};

use crate::theme::ThemeVariant;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Outcome of one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The stored choice was applied again.
    Restored(String),
    /// A new image was drawn, applied and persisted.
    Picked(String),
    /// Nothing to show for this variant; the page was left untouched.
    Empty,
}

impl Resolution {
    pub fn url(&self) -> Option<&str> {
        match self {
            Resolution::Restored(url) | Resolution::Picked(url) => Some(url),
            Resolution::Empty => None,
        }
    }
}

pub struct SelectionPolicy {
    store: Arc<dyn SelectionStore>,
    // Keeps choices for the session when the durable store fails.
    session: Mutex<HashMap<ThemeVariant, String>>,
    rng: Mutex<StdRng>,
}

impl SelectionPolicy {
    pub fn new(store: Arc<dyn SelectionStore>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    pub fn with_rng(store: Arc<dyn SelectionStore>, rng: StdRng) -> Self {
        Self {
            store,
            session: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Decides what to show for `variant` without touching the page.
    pub fn decide(&self, variant: ThemeVariant, images: &[String], force_random: bool) -> Resolution {
        if !force_random {
            if let Some(stored) = self.stored(variant) {
                return Resolution::Restored(stored);
            }
        }

        match self.pick(images) {
            Some(url) => Resolution::Picked(url),
            None => Resolution::Empty,
        }
    }

    /// Last choice for `variant`. A choice made this session wins; durable
    /// storage is only consulted when there is none, as on a fresh page load.
    pub fn stored(&self, variant: ThemeVariant) -> Option<String> {
        if let Some(choice) = self.session_choice(variant) {
            return Some(choice);
        }

        match self.store.get(variant.storage_key()) {
            Ok(value) => value.filter(|url| !url.is_empty()),
            Err(e) => {
                log::warn!("Reading {} failed, no stored selection: {e}", variant.storage_key());
                None
            }
        }
    }

    /// Uniform draw over the whole list; `None` for an empty list.
    pub fn pick(&self, images: &[String]) -> Option<String> {
        if images.is_empty() {
            return None;
        }
        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(0..images.len())
        };
        images.get(index).cloned()
    }

    /// Persists `url` as the choice for `variant`.
    pub fn remember(&self, variant: ThemeVariant, url: &str) {
        if let Ok(mut session) = self.session.lock() {
            session.insert(variant, url.to_string());
        }

        if let Err(e) = self.store.set(variant.storage_key(), url) {
            log::error!(
                "Persisting {} failed, keeping it for this session only: {e}",
                variant.storage_key()
            );
        }
    }

    fn session_choice(&self, variant: ThemeVariant) -> Option<String> {
        self.session
            .lock()
            .ok()
            .and_then(|session| session.get(&variant).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::StorageError;

    fn images(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| format!("/backgrounds/light/{name}")).collect()
    }

    #[test]
    fn test_restores_stored_choice() {
        let store = Arc::new(MemoryStore::with_entries([(
            "selectedLightBackground",
            "/backgrounds/light/b.jpg",
        )]));
        let policy = SelectionPolicy::with_rng(store, StdRng::seed_from_u64(7));

        let resolution = policy.decide(ThemeVariant::Light, &images(&["a.jpg"]), false);
        assert_eq!(
            resolution,
            Resolution::Restored("/backgrounds/light/b.jpg".to_string())
        );
    }

    #[test]
    fn test_force_random_ignores_stored_choice() {
        let store = Arc::new(MemoryStore::with_entries([(
            "selectedLightBackground",
            "/backgrounds/light/b.jpg",
        )]));
        let policy = SelectionPolicy::with_rng(store, StdRng::seed_from_u64(7));

        let resolution = policy.decide(ThemeVariant::Light, &images(&["a.jpg"]), true);
        assert_eq!(
            resolution,
            Resolution::Picked("/backgrounds/light/a.jpg".to_string())
        );
    }

    #[test]
    fn test_empty_list_resolves_empty() {
        let policy = SelectionPolicy::new(Arc::new(MemoryStore::new()));
        assert_eq!(policy.decide(ThemeVariant::Dark, &[], true), Resolution::Empty);
        assert_eq!(policy.decide(ThemeVariant::Dark, &[], false), Resolution::Empty);
    }

    #[test]
    fn test_remember_round_trips_through_store() {
        let store = Arc::new(MemoryStore::new());
        let policy = SelectionPolicy::new(store.clone());

        policy.remember(ThemeVariant::Dark, "/backgrounds/dark/x.jpg");

        assert_eq!(
            store.get("selectedDarkBackground").unwrap().as_deref(),
            Some("/backgrounds/dark/x.jpg")
        );
        assert_eq!(policy.stored(ThemeVariant::Light), None);
    }

    /// Reads succeed, writes are rejected, like storage over its quota.
    struct FullStore {
        inner: MemoryStore,
    }

    impl SelectionStore for FullStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable {
                reason: "quota exceeded".to_string(),
            })
        }
    }

    #[test]
    fn test_session_choice_wins_over_stale_durable_value() {
        let store = Arc::new(FullStore {
            inner: MemoryStore::with_entries([(
                "selectedLightBackground",
                "/backgrounds/light/old.jpg",
            )]),
        });
        let policy = SelectionPolicy::with_rng(store, StdRng::seed_from_u64(7));
        assert_eq!(
            policy.stored(ThemeVariant::Light).as_deref(),
            Some("/backgrounds/light/old.jpg")
        );

        policy.remember(ThemeVariant::Light, "/backgrounds/light/new.jpg");

        assert_eq!(
            policy.decide(ThemeVariant::Light, &images(&["a.jpg"]), false),
            Resolution::Restored("/backgrounds/light/new.jpg".to_string())
        );
    }
}
