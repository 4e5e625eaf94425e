//! Shared application state.

use std::sync::Arc;

use crate::config::StoreHubConfig;
use crate::db::RecordStore;

/// Shared state handed to every request handler.
///
/// Generic over the record store backend so the full router can run
/// against the in-memory store in tests. Cloning is cheap; everything
/// lives behind one `Arc`.
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    config: StoreHubConfig,
    store: S,
}

impl<S: RecordStore> AppState<S> {
    /// Build the application state.
    #[must_use]
    pub fn new(config: StoreHubConfig, store: S) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &StoreHubConfig {
        &self.inner.config
    }

    /// The record store backend.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }
}

// Manual impl: `#[derive(Clone)]` would demand `S: Clone`, which the Arc
// makes unnecessary.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
