//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Cloning is cheap: the config is behind an
//! `Arc` and the store is a pool handle or a shared table lock.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::RecordStore;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: RecordStore,
}

impl AppState {
    /// Default configuration over an empty in-memory store.
    pub fn new() -> Self {
        Self::with_store(AppConfig::default(), RecordStore::in_memory())
    }

    /// State over an explicitly constructed store.
    pub fn with_store(config: AppConfig, store: RecordStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
