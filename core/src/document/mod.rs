//! The slice of the page the controller touches.
//!
//! [`Document`] is deliberately narrow: the root theme class, the two
//! backdrop pseudo-element layers, style elements in the head and plain
//! elements such as the bootstrap overlay. Hosts implement it over a real
//! DOM; [`MemoryDocument`] records everything in memory.

pub mod memory;

pub use memory::{DocumentMutation, MemoryDocument, MemoryElement};

use crate::theme::ThemeVariant;
use async_trait::async_trait;

/// Where a new element is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    /// The document root, used while the body does not exist yet.
    Root,
    Body,
}

#[async_trait]
pub trait Document: Send + Sync {
    /// Classes currently set on the document root.
    fn root_classes(&self) -> Vec<String>;

    /// Theme variant derived from the root classes at call time.
    fn theme_variant(&self) -> ThemeVariant {
        ThemeVariant::from_root_classes(self.root_classes())
    }

    /// Whether the pseudo-element layer for `variant` is styled and present.
    fn has_backdrop_layer(&self, variant: ThemeVariant) -> bool;

    /// Sets the opacity of a backdrop layer. Absent layers are ignored.
    fn set_backdrop_opacity(&self, variant: ThemeVariant, opacity: f32);

    /// Text of the style element with `id`, if it exists.
    fn style_rule(&self, id: &str) -> Option<String>;

    /// Appends a new style element to the head.
    fn insert_style_rule(&self, id: &str, css: &str);

    /// Rewrites the text of an existing style element in place.
    fn update_style_rule(&self, id: &str, css: &str);

    fn body_available(&self) -> bool;

    /// Completes once the body exists.
    async fn wait_for_body(&self);

    fn element_exists(&self, id: &str) -> bool;

    /// Creates an element with inline `css` under `mount`.
    fn create_element(&self, id: &str, css: &str, mount: Mount);

    /// Moves an element attached to the root under the body.
    fn move_to_body(&self, id: &str);

    fn set_element_opacity(&self, id: &str, opacity: f32);

    fn set_element_visible(&self, id: &str, visible: bool);

    fn remove_element(&self, id: &str);
}
