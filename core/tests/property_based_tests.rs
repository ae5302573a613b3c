mod support;

use backdrop_core::selection::{MemoryStore, SelectionStore};
use backdrop_core::{Resolution, ThemeVariant};
use proptest::prelude::*;
use std::sync::Arc;
use support::*;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

fn variant_strategy() -> impl Strategy<Value = ThemeVariant> {
    prop_oneof![Just(ThemeVariant::Light), Just(ThemeVariant::Dark)]
}

#[cfg(test)]
mod selection_property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_forced_pick_is_in_list_and_persisted(
            names in prop::collection::vec("[a-z]{1,8}\\.jpg", 1..12),
            variant in variant_strategy(),
        ) {
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let h = harness(StubManifests::new().with_images(variant, &refs));
            h.document.set_theme(variant);

            let resolution = runtime().block_on(async {
                h.controller.bootstrap().await;
                h.controller.resolve(variant, true, false).await
            });

            let Resolution::Picked(picked) = resolution else {
                return Err(TestCaseError::fail("forced resolve must pick"));
            };
            prop_assert!(h.controller.images(variant).contains(&picked));
            prop_assert_eq!(
                h.store.get(variant.storage_key()).unwrap(),
                Some(picked)
            );
        }

        #[test]
        fn test_stored_choice_wins_without_force(
            names in prop::collection::vec("[a-z]{1,8}\\.jpg", 0..6),
            stored in "/backgrounds/[a-z]{1,8}\\.png",
            variant in variant_strategy(),
        ) {
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let store = Arc::new(MemoryStore::with_entries([(variant.storage_key(), stored.clone())]));
            let h = harness_with(
                StubManifests::new().with_images(variant, &refs),
                store,
                CountingLoader::new(),
            );
            h.document.set_theme(variant);

            let resolution = runtime().block_on(async {
                h.controller.bootstrap().await;
                h.controller.resolve(variant, false, false).await
            });

            prop_assert_eq!(resolution, Resolution::Restored(stored.clone()));
            prop_assert_eq!(h.store.get(variant.storage_key()).unwrap(), Some(stored));
        }
    }
}
