//! `localStorage`-backed [`PreferenceStore`].

use web_sys::Storage;

use crate::error::{Result, ScrollspyError};
use crate::prefs::PreferenceStore;

/// Wraps `window.localStorage`. When storage is unavailable (blocked
/// cookies, sandboxed iframes) reads return nothing and writes fail softly.
pub(crate) struct BrowserStore {
    storage: Option<Storage>,
}

impl BrowserStore {
    pub(crate) fn local() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable, preferences will not persist");
        }
        Self { storage }
    }
}

impl PreferenceStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| ScrollspyError::Storage("localStorage unavailable".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|e| ScrollspyError::Storage(format!("{key}: {e:?}")))
    }
}
