use backdrop_core::document::{Document, Mount};
use backdrop_core::overlay::{BootstrapOverlay, OVERLAY_ID, OverlaySettings};
use backdrop_core::{MemoryDocument, ThemeVariant};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn overlay(document: &Arc<MemoryDocument>) -> Arc<BootstrapOverlay> {
    Arc::new(BootstrapOverlay::new(
        document.clone(),
        OverlaySettings::default(),
    ))
}

#[tokio::test(start_paused = true)]
async fn test_show_show_hide_show_never_duplicates() {
    let document = Arc::new(MemoryDocument::new());
    let overlay = overlay(&document);

    overlay.show();
    assert_eq!(document.element_count(OVERLAY_ID), 1);

    overlay.show();
    assert_eq!(document.element_count(OVERLAY_ID), 1);

    let hiding = {
        let overlay = overlay.clone();
        tokio::spawn(async move { overlay.hide().await })
    };
    sleep(Duration::from_millis(10)).await;
    assert!(document.element_count(OVERLAY_ID) <= 1);

    hiding.await.unwrap();
    assert_eq!(document.element_count(OVERLAY_ID), 0);

    overlay.show();
    assert_eq!(document.element_count(OVERLAY_ID), 1);
    assert_eq!(document.element(OVERLAY_ID).unwrap().opacity, 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_hide_removes_after_fade() {
    let document = Arc::new(MemoryDocument::new());
    let overlay = overlay(&document);
    overlay.show();

    let hiding = {
        let overlay = overlay.clone();
        tokio::spawn(async move { overlay.hide().await })
    };

    sleep(Duration::from_millis(299)).await;
    let element = document.element(OVERLAY_ID).unwrap();
    assert_eq!(element.opacity, 0.0);

    hiding.await.unwrap();
    assert!(!overlay.is_present());

    // hiding again is a no-op
    overlay.hide().await;
    assert!(!overlay.is_present());
}

#[tokio::test(start_paused = true)]
async fn test_overlay_moves_to_body_when_it_appears() {
    let document = Arc::new(MemoryDocument::without_body());
    let overlay = overlay(&document);

    overlay.show();
    assert_eq!(document.element(OVERLAY_ID).unwrap().mount, Mount::Root);

    document.set_body_ready();
    sleep(Duration::from_millis(1)).await;

    assert_eq!(document.element(OVERLAY_ID).unwrap().mount, Mount::Body);
    assert_eq!(document.element_count(OVERLAY_ID), 1);
}

#[tokio::test(start_paused = true)]
async fn test_tint_is_fixed_at_creation() {
    let document = Arc::new(MemoryDocument::new());
    document.set_theme(ThemeVariant::Dark);
    let overlay = overlay(&document);

    overlay.show();
    document.set_theme(ThemeVariant::Light);
    overlay.show();

    let element = document.element(OVERLAY_ID).unwrap();
    assert!(element.css.contains("#121212"));
    assert!(document.body_available());
}
