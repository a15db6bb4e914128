//! Persisted user preferences: colour theme and header visibility.
//!
//! Values live in a [`PreferenceStore`]; in the browser that is
//! `localStorage`, in tests a [`MemoryStore`].

use std::collections::HashMap;

use crate::error::Result;

/// Storage key for the theme preference.
pub const THEME_KEY: &str = "theme";
/// Storage key for the header visibility preference.
pub const HEADER_VISIBLE_KEY: &str = "headerVisible";

/// String key-value store backing the preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Non-persistent store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored value wins; without one, follow the user agent preference.
    ///
    /// Any stored value other than `"dark"` means light.
    pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Self {
        match stored {
            Some("dark") => Self::Dark,
            Some(_) => Self::Light,
            None if prefers_dark => Self::Dark,
            None => Self::Light,
        }
    }

    /// Theme carried by a `data-theme` attribute value.
    pub fn from_attribute(value: Option<&str>) -> Self {
        if value == Some("dark") {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Toggle button text: offers the opposite theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Dark => "\u{2600}\u{fe0f}",
            Self::Light => "\u{1f319}",
        }
    }
}

/// Resolve the theme from `store`, falling back to `prefers_dark`.
pub fn load_theme(store: &dyn PreferenceStore, prefers_dark: bool) -> Theme {
    Theme::resolve(store.get(THEME_KEY).as_deref(), prefers_dark)
}

pub fn save_theme(store: &mut dyn PreferenceStore, theme: Theme) -> Result<()> {
    store.set(THEME_KEY, theme.as_str())
}

/// Header visibility preference; absent means visible.
pub fn load_header_visible(store: &dyn PreferenceStore) -> bool {
    match store.get(HEADER_VISIBLE_KEY).as_deref() {
        None => true,
        Some(v) => v == "1",
    }
}

pub fn save_header_visible(store: &mut dyn PreferenceStore, visible: bool) -> Result<()> {
    store.set(HEADER_VISIBLE_KEY, if visible { "1" } else { "0" })
}

/// Header toggle button text: describes the action the button performs.
pub fn header_toggle_label(visible: bool) -> &'static str {
    if visible {
        "隱藏頂欄"
    } else {
        "顯示頂欄"
    }
}

/// `aria-pressed` attribute value.
pub fn aria_pressed(pressed: bool) -> &'static str {
    if pressed {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some("dark"), false, Theme::Dark ; "stored dark beats light ua")]
    #[test_case(Some("light"), true, Theme::Light ; "stored light beats dark ua")]
    #[test_case(Some("sepia"), true, Theme::Light ; "unknown stored value is light")]
    #[test_case(None, true, Theme::Dark ; "no stored value follows dark ua")]
    #[test_case(None, false, Theme::Light ; "no stored value follows light ua")]
    fn test_theme_resolve(stored: Option<&str>, prefers_dark: bool, expected: Theme) {
        assert_eq!(Theme::resolve(stored, prefers_dark), expected);
    }

    #[test]
    fn test_theme_round_trip_through_store() {
        let mut store = MemoryStore::new();
        assert_eq!(load_theme(&store, true), Theme::Dark);
        save_theme(&mut store, Theme::Light).unwrap();
        assert_eq!(load_theme(&store, true), Theme::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_toggle_and_labels() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle_label(), "\u{2600}\u{fe0f}");
        assert_eq!(Theme::Light.toggle_label(), "\u{1f319}");
        assert_eq!(Theme::from_attribute(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_attribute(None), Theme::Light);
    }

    #[test]
    fn test_header_visibility_defaults_to_visible() {
        let store = MemoryStore::new();
        assert!(load_header_visible(&store));
        let store = MemoryStore::new().with(HEADER_VISIBLE_KEY, "0");
        assert!(!load_header_visible(&store));
    }

    #[test]
    fn test_header_visibility_saved_as_flag() {
        let mut store = MemoryStore::new();
        save_header_visible(&mut store, false).unwrap();
        assert_eq!(store.get(HEADER_VISIBLE_KEY).as_deref(), Some("0"));
        assert_eq!(header_toggle_label(false), "顯示頂欄");
        assert_eq!(aria_pressed(true), "true");
    }
}
