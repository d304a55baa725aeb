//! `localStorage` adapter for the session store

use crate::config::FrontendConfig;
use portal_core::{KeyValueStorage, SessionStore};
use tracing::warn;
use web_sys::Storage;

/// Session store persisted in the browser
pub type BrowserSession = SessionStore<BrowserStorage>;

/// [`KeyValueStorage`] over `window.localStorage`
///
/// When storage is unavailable (private mode, sandboxed iframe) reads return
/// nothing and writes are dropped, which leaves the user logged out.
#[derive(Debug, Clone)]
pub struct BrowserStorage {
    inner: Option<Storage>,
}

impl BrowserStorage {
    pub fn local() -> Self {
        let inner = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if inner.is_none() {
            warn!("localStorage is unavailable, sessions will not persist");
        }
        Self { inner }
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.inner {
            if storage.set_item(key, value).is_err() {
                warn!(key, "Failed to write to localStorage");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = &self.inner {
            if storage.remove_item(key).is_err() {
                warn!(key, "Failed to remove from localStorage");
            }
        }
    }
}

/// The session as stored in this browser, with the configured lifetime
pub fn browser_session() -> BrowserSession {
    SessionStore::from_config(BrowserStorage::local(), &FrontendConfig::portal())
}
