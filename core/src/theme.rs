//! Light/dark theme variants.
//!
//! The variant is never stored: it is read from the document root's class
//! list every time an operation needs it, so a theme toggle that happened
//! between two operations is always observed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Class on the document root that marks dark mode.
pub const DARK_CLASS: &str = "dark";

/// Display mode of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    Light,
    Dark,
}

impl ThemeVariant {
    pub const ALL: [ThemeVariant; 2] = [ThemeVariant::Light, ThemeVariant::Dark];

    /// Derives the variant from the classes currently on the document root.
    pub fn from_root_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if classes.into_iter().any(|class| class.as_ref() == DARK_CLASS) {
            ThemeVariant::Dark
        } else {
            ThemeVariant::Light
        }
    }

    /// Directory name used by the manifest and image paths.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeVariant::Light => "light",
            ThemeVariant::Dark => "dark",
        }
    }

    /// Durable storage key holding the last applied image for this variant.
    pub fn storage_key(self) -> &'static str {
        match self {
            ThemeVariant::Light => "selectedLightBackground",
            ThemeVariant::Dark => "selectedDarkBackground",
        }
    }

    /// Selector of the fixed-position pseudo-element painting this variant's
    /// background.
    pub fn backdrop_selector(self) -> &'static str {
        match self {
            ThemeVariant::Light => "html::before",
            ThemeVariant::Dark => "html.dark::before",
        }
    }
}

impl fmt::Display for ThemeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeVariant::Light),
            "dark" => Ok(ThemeVariant::Dark),
            other => Err(format!("Unknown theme variant '{other}' (expected light or dark)")),
        }
    }
}
