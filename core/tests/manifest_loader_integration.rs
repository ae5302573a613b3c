mod support;

use backdrop_core::manifest::{
    BackgroundPaths, DARK_FALLBACK_IMAGE, LIGHT_FALLBACK_IMAGE, ManifestLoader,
};
use backdrop_core::preload::PreloadCache;
use backdrop_core::ThemeVariant;
use std::sync::Arc;
use std::time::Duration;
use support::*;

struct Setup {
    loader: ManifestLoader,
    manifests: Arc<StubManifests>,
    images: Arc<CountingLoader>,
    preload: Arc<PreloadCache>,
}

fn setup(manifests: StubManifests, domain: &str) -> Setup {
    let manifests = Arc::new(manifests);
    let images = Arc::new(CountingLoader::new());
    let preload = Arc::new(PreloadCache::new(images.clone()));
    let loader = ManifestLoader::new(
        manifests.clone(),
        BackgroundPaths::new(domain),
        preload.clone(),
    );
    Setup {
        loader,
        manifests,
        images,
        preload,
    }
}

#[tokio::test(start_paused = true)]
async fn test_server_error_for_dark_only_affects_dark() {
    let s = setup(
        StubManifests::new()
            .with_images(ThemeVariant::Light, &["a.jpg", "b.jpg"])
            .with_status(ThemeVariant::Dark, 500),
        "",
    );

    let sets = s.loader.load_manifests().await;

    assert_eq!(sets.light, vec![light("a.jpg"), light("b.jpg")]);
    assert_eq!(sets.dark, vec![DARK_FALLBACK_IMAGE.to_string()]);
    assert_eq!(s.manifests.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_and_malformed_manifests_fall_back() {
    let s = setup(
        StubManifests::new().with_body(ThemeVariant::Light, "{\"images\": \"not-a-list\"}"),
        "",
    );

    let sets = s.loader.load_manifests().await;

    assert_eq!(sets.light, vec![LIGHT_FALLBACK_IMAGE.to_string()]);
    assert_eq!(sets.dark, vec![DARK_FALLBACK_IMAGE.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_empty_and_duplicate_lists_are_kept_as_is() {
    let s = setup(
        StubManifests::new()
            .with_images(ThemeVariant::Light, &[])
            .with_images(ThemeVariant::Dark, &["n.jpg", "n.jpg"]),
        "",
    );

    let sets = s.loader.load_manifests().await;

    assert!(sets.light.is_empty());
    assert_eq!(sets.dark, vec![dark("n.jpg"), dark("n.jpg")]);
}

#[tokio::test(start_paused = true)]
async fn test_domain_produces_absolute_urls() {
    let manifests = Arc::new(StubManifests::new());
    let preload = Arc::new(PreloadCache::new(Arc::new(CountingLoader::new())));
    let loader = ManifestLoader::new(
        manifests.clone(),
        BackgroundPaths::new("images.example.com"),
        preload,
    );

    // the stub only knows root-relative URLs, so both variants fall back
    let sets = loader.load_manifests().await;

    assert_eq!(
        loader.paths().manifest_url(ThemeVariant::Light),
        "https://images.example.com/backgrounds/light/index.json"
    );
    assert_eq!(sets.light, vec![LIGHT_FALLBACK_IMAGE.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_first_image_of_each_list_is_warmed() {
    let s = setup(
        StubManifests::new()
            .with_images(ThemeVariant::Light, &["a.jpg", "b.jpg"])
            .with_images(ThemeVariant::Dark, &["n.jpg"]),
        "",
    );

    s.loader.load_manifests().await;
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert!(s.preload.contains(&light("a.jpg")));
    assert!(s.preload.contains(&dark("n.jpg")));
    assert!(!s.preload.contains(&light("b.jpg")));
    assert_eq!(s.images.loads(&light("a.jpg")), 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_list_warms_nothing() {
    let s = setup(
        StubManifests::new()
            .with_images(ThemeVariant::Light, &[])
            .with_images(ThemeVariant::Dark, &[]),
        "",
    );

    s.loader.load_manifests().await;
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert!(s.preload.is_empty());
    assert_eq!(s.images.total_loads(), 0);
}
