//! Crossfading a new background into place.
//!
//! One call runs four phases in strict order: fade the variant's backdrop
//! layer out, wait for the preload, swap the managed style rule after the
//! settle delay, then fade back in after the gap and wait out the rest of
//! the transition. The call returns when the transition is finished, not
//! when it starts.

use crate::document::Document;
use crate::preload::PreloadCache;
use crate::theme::ThemeVariant;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// Id of the single style element the controller owns.
pub const MANAGED_STYLE_ID: &str = "random-background-style";

/// Opacity of the backdrop layer while the image is swapped.
pub const FADED_OUT_OPACITY: f32 = 0.01;

pub const FULL_OPACITY: f32 = 1.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimingsError {
    #[error("swap settle delay must be positive")]
    ZeroSettle,
    #[error("swap settle delay ({settle_ms} ms) must be shorter than the fade-in gap ({gap_ms} ms)")]
    SettleNotBeforeGap { settle_ms: u64, gap_ms: u64 },
    #[error("settle ({settle_ms} ms) plus gap ({gap_ms} ms) exceed the transition ({total_ms} ms)")]
    ExceedsTotal {
        settle_ms: u64,
        gap_ms: u64,
        total_ms: u64,
    },
}

/// Delays of one crossfade, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransitionTimings {
    /// Wait after the preload before the image is swapped.
    pub swap_settle_ms: u64,
    /// Wait after the swap before opacity is raised again.
    pub fade_in_gap_ms: u64,
    /// Length of the whole transition, measured from the end of the preload.
    pub total_ms: u64,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            swap_settle_ms: 50,
            fade_in_gap_ms: 100,
            total_ms: 1000,
        }
    }
}

impl TransitionTimings {
    pub fn validate(&self) -> Result<(), TimingsError> {
        if self.swap_settle_ms == 0 {
            return Err(TimingsError::ZeroSettle);
        }
        if self.swap_settle_ms >= self.fade_in_gap_ms {
            return Err(TimingsError::SettleNotBeforeGap {
                settle_ms: self.swap_settle_ms,
                gap_ms: self.fade_in_gap_ms,
            });
        }
        if self.swap_settle_ms + self.fade_in_gap_ms > self.total_ms {
            return Err(TimingsError::ExceedsTotal {
                settle_ms: self.swap_settle_ms,
                gap_ms: self.fade_in_gap_ms,
                total_ms: self.total_ms,
            });
        }
        Ok(())
    }

    pub fn swap_settle(&self) -> Duration {
        Duration::from_millis(self.swap_settle_ms)
    }

    pub fn fade_in_gap(&self) -> Duration {
        Duration::from_millis(self.fade_in_gap_ms)
    }

    /// What is left of the transition once the image is faded back in.
    pub fn remainder(&self) -> Duration {
        Duration::from_millis(
            self.total_ms
                .saturating_sub(self.swap_settle_ms + self.fade_in_gap_ms),
        )
    }
}

/// CSS of the managed rule showing `url` on `variant`'s backdrop layer.
pub fn background_rule(variant: ThemeVariant, url: &str) -> String {
    let escaped = url.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "{} {{ background-image: url('{escaped}') !important; }}",
        variant.backdrop_selector()
    )
}

pub struct BackgroundApplier {
    document: Arc<dyn Document>,
    preload: Arc<PreloadCache>,
    timings: TransitionTimings,
}

impl BackgroundApplier {
    pub fn new(
        document: Arc<dyn Document>,
        preload: Arc<PreloadCache>,
        timings: TransitionTimings,
    ) -> Self {
        Self {
            document,
            preload,
            timings,
        }
    }

    pub fn timings(&self) -> &TransitionTimings {
        &self.timings
    }

    /// Crossfades `url` in as the background of `variant`.
    ///
    /// Without a backdrop layer in the page the fades are skipped, but the
    /// style rule is still written so it is correct once the layer exists.
    pub async fn apply(&self, url: &str, variant: ThemeVariant) {
        log::debug!("Applying {variant} background {url}");

        self.fade(variant, FADED_OUT_OPACITY);

        if let Err(e) = self.preload.preload(url).await {
            log::warn!("Continuing background transition without preload: {e}");
        }

        sleep(self.timings.swap_settle()).await;
        self.write_rule(variant, url);

        sleep(self.timings.fade_in_gap()).await;
        self.fade(variant, FULL_OPACITY);

        sleep(self.timings.remainder()).await;
        log::debug!("Background transition to {url} finished");
    }

    /// Writes the rule for `url` at once, without preloading or fading.
    pub fn reapply(&self, url: &str, variant: ThemeVariant) {
        self.write_rule(variant, url);
        self.fade(variant, FULL_OPACITY);
    }

    /// Text of the managed rule currently in the document.
    pub fn current_rule(&self) -> Option<String> {
        self.document.style_rule(MANAGED_STYLE_ID)
    }

    fn fade(&self, variant: ThemeVariant, opacity: f32) {
        if self.document.has_backdrop_layer(variant) {
            self.document.set_backdrop_opacity(variant, opacity);
        } else {
            log::debug!("No {variant} backdrop layer yet, skipping fade");
        }
    }

    fn write_rule(&self, variant: ThemeVariant, url: &str) {
        let css = background_rule(variant, url);
        if self.document.style_rule(MANAGED_STYLE_ID).is_some() {
            self.document.update_style_rule(MANAGED_STYLE_ID, &css);
        } else {
            self.document.insert_style_rule(MANAGED_STYLE_ID, &css);
        }
    }
}
