use super::{Document, Mount};
use crate::theme::{DARK_CLASS, ThemeVariant};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

/// A recorded change to a [`MemoryDocument`], in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentMutation {
    BackdropOpacity(ThemeVariant, f32),
    StyleInserted { id: String, css: String },
    StyleUpdated { id: String, css: String },
    ElementCreated { id: String, mount: Mount },
    ElementMoved { id: String },
    ElementOpacity { id: String, opacity: f32 },
    ElementVisible { id: String, visible: bool },
    ElementRemoved { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryElement {
    pub id: String,
    pub css: String,
    pub mount: Mount,
    pub opacity: f32,
    pub visible: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    root_classes: Vec<String>,
    layers: HashMap<ThemeVariant, f32>,
    styles: Vec<(String, String)>,
    elements: Vec<MemoryElement>,
    history: Vec<DocumentMutation>,
}

/// In-memory [`Document`] that records every mutation.
///
/// Used by the preview CLI and by tests. Duplicate style elements or
/// overlay nodes are stored as duplicates, so the controller's "only ever
/// one" guarantees can be observed rather than assumed.
pub struct MemoryDocument {
    state: Mutex<MemoryState>,
    body: watch::Sender<bool>,
}

impl MemoryDocument {
    /// A light-themed document with a body and both backdrop layers.
    pub fn new() -> Self {
        let mut layers = HashMap::new();
        layers.insert(ThemeVariant::Light, 1.0);
        layers.insert(ThemeVariant::Dark, 1.0);

        let (body, _) = watch::channel(true);
        Self {
            state: Mutex::new(MemoryState {
                layers,
                ..MemoryState::default()
            }),
            body,
        }
    }

    /// A document still being parsed: no body yet.
    pub fn without_body() -> Self {
        let document = Self::new();
        document.body.send_replace(false);
        document
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Toggles the root theme class, the way the site's theme switch does.
    pub fn set_theme(&self, variant: ThemeVariant) {
        let mut state = self.state();
        state.root_classes.retain(|class| class != DARK_CLASS);
        if variant == ThemeVariant::Dark {
            state.root_classes.push(DARK_CLASS.to_string());
        }
    }

    pub fn set_body_ready(&self) {
        self.body.send_replace(true);
    }

    /// Removes both backdrop layers, as if their transition styles were
    /// not injected yet.
    pub fn remove_backdrop_layers(&self) {
        self.state().layers.clear();
    }

    pub fn backdrop_opacity(&self, variant: ThemeVariant) -> Option<f32> {
        self.state().layers.get(&variant).copied()
    }

    /// Number of style elements carrying `id`.
    pub fn style_count(&self, id: &str) -> usize {
        self.state()
            .styles
            .iter()
            .filter(|(style_id, _)| style_id == id)
            .count()
    }

    /// Number of elements carrying `id`.
    pub fn element_count(&self, id: &str) -> usize {
        self.state()
            .elements
            .iter()
            .filter(|element| element.id == id)
            .count()
    }

    pub fn element(&self, id: &str) -> Option<MemoryElement> {
        self.state()
            .elements
            .iter()
            .find(|element| element.id == id)
            .cloned()
    }

    pub fn history(&self) -> Vec<DocumentMutation> {
        self.state().history.clone()
    }

    pub fn clear_history(&self) {
        self.state().history.clear();
    }

    /// Replaces head styles and body content the way a same-document
    /// navigation does. Root classes and backdrop layers survive.
    pub fn simulate_swap(&self) {
        let mut state = self.state();
        state.styles.clear();
        state.elements.clear();
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Document for MemoryDocument {
    fn root_classes(&self) -> Vec<String> {
        self.state().root_classes.clone()
    }

    fn has_backdrop_layer(&self, variant: ThemeVariant) -> bool {
        self.state().layers.contains_key(&variant)
    }

    fn set_backdrop_opacity(&self, variant: ThemeVariant, opacity: f32) {
        let mut state = self.state();
        if let Some(layer) = state.layers.get_mut(&variant) {
            *layer = opacity;
            state
                .history
                .push(DocumentMutation::BackdropOpacity(variant, opacity));
        }
    }

    fn style_rule(&self, id: &str) -> Option<String> {
        self.state()
            .styles
            .iter()
            .find(|(style_id, _)| style_id == id)
            .map(|(_, css)| css.clone())
    }

    fn insert_style_rule(&self, id: &str, css: &str) {
        let mut state = self.state();
        state.styles.push((id.to_string(), css.to_string()));
        state.history.push(DocumentMutation::StyleInserted {
            id: id.to_string(),
            css: css.to_string(),
        });
    }

    fn update_style_rule(&self, id: &str, css: &str) {
        let mut state = self.state();
        let Some(style) = state.styles.iter_mut().find(|(style_id, _)| style_id == id) else {
            return;
        };
        style.1 = css.to_string();
        state.history.push(DocumentMutation::StyleUpdated {
            id: id.to_string(),
            css: css.to_string(),
        });
    }

    fn body_available(&self) -> bool {
        *self.body.borrow()
    }

    async fn wait_for_body(&self) {
        let mut ready = self.body.subscribe();
        while !*ready.borrow_and_update() {
            if ready.changed().await.is_err() {
                return;
            }
        }
    }

    fn element_exists(&self, id: &str) -> bool {
        self.state().elements.iter().any(|element| element.id == id)
    }

    fn create_element(&self, id: &str, css: &str, mount: Mount) {
        let mut state = self.state();
        state.elements.push(MemoryElement {
            id: id.to_string(),
            css: css.to_string(),
            mount,
            opacity: 1.0,
            visible: true,
        });
        state.history.push(DocumentMutation::ElementCreated {
            id: id.to_string(),
            mount,
        });
    }

    fn move_to_body(&self, id: &str) {
        let mut state = self.state();
        let Some(element) = state.elements.iter_mut().find(|element| element.id == id) else {
            return;
        };
        element.mount = Mount::Body;
        state
            .history
            .push(DocumentMutation::ElementMoved { id: id.to_string() });
    }

    fn set_element_opacity(&self, id: &str, opacity: f32) {
        let mut state = self.state();
        let Some(element) = state.elements.iter_mut().find(|element| element.id == id) else {
            return;
        };
        element.opacity = opacity;
        state.history.push(DocumentMutation::ElementOpacity {
            id: id.to_string(),
            opacity,
        });
    }

    fn set_element_visible(&self, id: &str, visible: bool) {
        let mut state = self.state();
        let Some(element) = state.elements.iter_mut().find(|element| element.id == id) else {
            return;
        };
        element.visible = visible;
        state.history.push(DocumentMutation::ElementVisible {
            id: id.to_string(),
            visible,
        });
    }

    fn remove_element(&self, id: &str) {
        let mut state = self.state();
        let before = state.elements.len();
        state.elements.retain(|element| element.id != id);
        if state.elements.len() != before {
            state
                .history
                .push(DocumentMutation::ElementRemoved { id: id.to_string() });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle_updates_variant() {
        let document = MemoryDocument::new();
        assert_eq!(document.theme_variant(), ThemeVariant::Light);

        document.set_theme(ThemeVariant::Dark);
        assert_eq!(document.theme_variant(), ThemeVariant::Dark);

        document.set_theme(ThemeVariant::Light);
        assert!(document.root_classes().is_empty());
    }

    #[test]
    fn test_absent_layer_ignores_opacity() {
        let document = MemoryDocument::new();
        document.remove_backdrop_layers();
        document.set_backdrop_opacity(ThemeVariant::Light, 0.5);

        assert_eq!(document.backdrop_opacity(ThemeVariant::Light), None);
        assert!(document.history().is_empty());
    }

    #[tokio::test]
    async fn test_wait_for_body_completes_when_ready() {
        let document = std::sync::Arc::new(MemoryDocument::without_body());
        assert!(!document.body_available());

        let waiter = {
            let document = document.clone();
            tokio::spawn(async move { document.wait_for_body().await })
        };
        document.set_body_ready();

        waiter.await.unwrap();
        assert!(document.body_available());
    }
}
