//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::storage::{ObjectStore, StorageError};
use crate::transfer::CipherKey;

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to open storage root: {0}")]
    Storage(#[from] StorageError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: ObjectStore,
}

impl AppState {
    /// Create a new application state
    ///
    /// Creates the storage root if it does not exist yet.
    pub fn new(config: Config) -> Result<Self, StateError> {
        let store = ObjectStore::open(&config.storage.root)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, store }),
        })
    }

    /// Get the object store
    pub fn store(&self) -> &ObjectStore {
        &self.inner.store
    }

    pub fn cipher(&self) -> Option<&CipherKey> {
        self.inner.config.cipher.as_ref()
    }

    pub fn upload_cookie(&self) -> &[u8] {
        self.inner.config.auth.upload_cookie.as_bytes()
    }

    pub fn buffer_size(&self) -> usize {
        self.inner.config.storage.buffer_size
    }
}
