//! Shared handle passed to repositories and services.

use std::sync::Arc;

use crate::keys::Keys;
use crate::store::KeyValueStore;

/// Store handle plus key layout, shared by every repository and service.
///
/// This struct is cheaply cloneable via `Arc`, so one connection can serve
/// any number of tasks.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Box<dyn KeyValueStore>,
    keys: Keys,
}

impl AppState {
    /// Create a new application state around an injected store.
    pub fn new(store: impl KeyValueStore + 'static, keys: Keys) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store: Box::new(store),
                keys,
            }),
        }
    }

    /// Get a reference to the key-value store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the key layout.
    #[must_use]
    pub fn keys(&self) -> &Keys {
        &self.inner.keys
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("keys", &self.inner.keys)
            .finish_non_exhaustive()
    }
}
