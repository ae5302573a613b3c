//! # Backdrop Core Library
//!
//! Client-side background controller for themed static sites. It discovers
//! background images from per-theme manifests, preloads them, crossfades
//! them into the page, remembers the visitor's choice and masks the first
//! resolution of a page load behind an overlay.
//!
//! ## Modules
//!
//! - [`controller`] - The controller owning all shared state, and event wiring
//! - [`manifest`] - Manifest fetching, URL building and fallbacks
//! - [`preload`] - Memoized off-document image loading
//! - [`applier`] - Crossfade sequence against the managed style rule
//! - [`selection`] - Restore-or-pick policy and durable selection storage
//! - [`overlay`] - The bootstrap overlay
//! - [`document`] - The page surface the controller mutates
//! - [`theme`] - Light/dark variants
//! - [`common`] - Error types and HTTP helpers

pub mod applier;
pub mod common;
pub mod controller;
pub mod document;
pub mod manifest;
pub mod overlay;
pub mod preload;
pub mod selection;
pub mod theme;

pub use applier::{BackgroundApplier, TransitionTimings};
pub use controller::{
    BackgroundController, Collaborators, ControllerSettings, EventOutcome, PageEvent,
};
pub use document::{Document, MemoryDocument};
pub use selection::Resolution;
pub use theme::ThemeVariant;
