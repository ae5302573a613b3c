use crate::selection::Resolution;
use std::fmt;

/// Signals the host page delivers to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The initial document finished parsing.
    DomReady,
    /// A page finished loading, initially or after a same-document
    /// navigation.
    PageLoad,
    /// A same-document navigation is about to replace the page content.
    BeforeSwap,
    /// The theme toggle switched between light and dark.
    ThemeChanged,
    /// The visitor asked for a different background.
    ChangeRequested,
}

impl fmt::Display for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageEvent::DomReady => "DOMContentLoaded",
            PageEvent::PageLoad => "page-load",
            PageEvent::BeforeSwap => "before-swap",
            PageEvent::ThemeChanged => "theme-changed",
            PageEvent::ChangeRequested => "change-background",
        };
        f.write_str(name)
    }
}

/// What handling one [`PageEvent`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The bootstrap sequence ran to completion.
    Bootstrapped(Resolution),
    /// Another bootstrap was in flight, or the page was already
    /// bootstrapped; the trigger was dropped.
    Dropped,
    /// A theme change or manual request resolved a background.
    Resolved(Resolution),
    /// A soft navigation re-wrote the last known background, if any.
    Reapplied(Option<String>),
    /// The managed rule the outgoing page carried at swap time.
    Carried(Option<String>),
}
