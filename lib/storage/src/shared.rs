use networth_core::{ProfileStore, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;
use crate::ProfileStoreLoader;

/// Process-wide handle to the current store snapshot.
///
/// Readers clone the `Arc` and rank against it without holding any lock.
/// A reload builds the new store first and then swaps the pointer, so a
/// query that started on the old snapshot finishes on it.
pub struct SharedStore {
    current: RwLock<Arc<ProfileStore>>,
}

impl SharedStore {
    pub fn new(store: ProfileStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    pub fn snapshot(&self) -> Arc<ProfileStore> {
        self.current.read().clone()
    }

    /// Replace the store, returning the previous snapshot
    pub fn swap(&self, store: ProfileStore) -> Arc<ProfileStore> {
        std::mem::replace(&mut *self.current.write(), Arc::new(store))
    }

    /// Load from disk and swap on success; on failure the current store stays
    pub fn reload(&self, loader: &ProfileStoreLoader) -> Result<Arc<ProfileStore>> {
        let store = Arc::new(loader.load()?);
        *self.current.write() = store.clone();
        info!("Profile store reloaded: {} profiles", store.len());
        Ok(store)
    }
}
