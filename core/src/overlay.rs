//! Full-viewport cover hiding the page background while it resolves.
//!
//! At most one overlay node exists at any time. `show` reuses a present node
//! and `hide` only removes the node it faded out if nobody showed it again
//! during the fade.

use crate::document::{Document, Mount};
use crate::theme::ThemeVariant;
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const OVERLAY_ID: &str = "background-loading-overlay";

/// Appearance of the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub fade_ms: u64,
    pub light_color: String,
    pub dark_color: String,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            fade_ms: 300,
            light_color: "#f5f5f5".to_string(),
            dark_color: "#121212".to_string(),
        }
    }
}

impl OverlaySettings {
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn color(&self, variant: ThemeVariant) -> &str {
        match variant {
            ThemeVariant::Light => &self.light_color,
            ThemeVariant::Dark => &self.dark_color,
        }
    }

    fn css(&self, variant: ThemeVariant) -> String {
        format!(
            "position: fixed; inset: 0; z-index: 2147483647; background-color: {}; \
             opacity: 1; transition: opacity {}ms ease;",
            self.color(variant),
            self.fade_ms
        )
    }
}

#[derive(Default)]
struct OverlayState {
    // Bumped by every show so a pending hide can tell it was superseded.
    generation: u64,
    relocation: Option<CancellationToken>,
}

pub struct BootstrapOverlay {
    document: Arc<dyn Document>,
    settings: OverlaySettings,
    state: Mutex<OverlayState>,
}

impl BootstrapOverlay {
    pub fn new(document: Arc<dyn Document>, settings: OverlaySettings) -> Self {
        Self {
            document,
            settings,
            state: Mutex::new(OverlayState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, OverlayState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_present(&self) -> bool {
        self.document.element_exists(OVERLAY_ID)
    }

    /// Makes the overlay opaque, creating it if it does not exist.
    ///
    /// The tint follows the theme at creation time only. Moving a root-mounted
    /// overlay under the body needs a Tokio runtime; without one the overlay
    /// stays under the root until it is hidden.
    pub fn show(&self) {
        let mut state = self.state();
        state.generation += 1;

        if self.document.element_exists(OVERLAY_ID) {
            self.document.set_element_visible(OVERLAY_ID, true);
            self.document.set_element_opacity(OVERLAY_ID, 1.0);
            return;
        }

        let css = self.settings.css(self.document.theme_variant());
        if self.document.body_available() {
            self.document.create_element(OVERLAY_ID, &css, Mount::Body);
        } else {
            self.document.create_element(OVERLAY_ID, &css, Mount::Root);
            if let Some(stale) = state.relocation.replace(self.relocate_when_body_ready()) {
                stale.cancel();
            }
        }
        self.document.set_element_opacity(OVERLAY_ID, 1.0);
        log::debug!("Bootstrap overlay shown");
    }

    /// Fades the overlay out and removes it. No-op when absent.
    pub async fn hide(&self) {
        let generation = {
            let state = self.state();
            if !self.document.element_exists(OVERLAY_ID) {
                return;
            }
            state.generation
        };

        self.document.set_element_opacity(OVERLAY_ID, 0.0);
        tokio::time::sleep(self.settings.fade()).await;

        let mut state = self.state();
        if state.generation != generation {
            log::debug!("Bootstrap overlay shown again during fade, keeping it");
            return;
        }
        if let Some(relocation) = state.relocation.take() {
            relocation.cancel();
        }
        self.document.remove_element(OVERLAY_ID);
        log::debug!("Bootstrap overlay removed");
    }

    fn relocate_when_body_ready(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let document = Arc::clone(&self.document);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("No async runtime, bootstrap overlay stays under the document root");
            return token;
        };

        runtime.spawn(async move {
            tokio::select! {
                () = document.wait_for_body() => {
                    if document.element_exists(OVERLAY_ID) {
                        document.move_to_body(OVERLAY_ID);
                        log::debug!("Bootstrap overlay moved under the body");
                    }
                }
                () = cancelled.cancelled() => {}
            }
        });

        token
    }
}
