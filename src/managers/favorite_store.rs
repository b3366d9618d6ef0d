//! Favorite Store.
//!
//! Holds one agent's working copy of the shared favorite collection. The copy
//! is not a cache: every mutation path reloads it, changes it and saves it
//! back with no suspension point between the load finishing and the save
//! starting. Two agents can still interleave whole cycles, in which case the
//! last save wins.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::services::storage_local::KeyValueStore;
use crate::types::errors::StorageError;
use crate::types::favorite::{FavoriteCollection, FavoriteRecord, FAVORITE_TABS_KEY};
use crate::types::tab::{TabId, WindowId};

/// Trait defining the favorite store interface.
#[async_trait(?Send)]
pub trait FavoriteStoreTrait {
    /// Replaces the working copy with the persisted collection.
    async fn load(&mut self) -> Result<(), StorageError>;
    /// Writes the whole working copy back, replacing the persisted value.
    async fn save(&self) -> Result<(), StorageError>;
    fn is_favorite(&self, tab_id: TabId, window_id: WindowId) -> bool;
    fn remove(&mut self, tab_id: TabId, window_id: WindowId);
    fn add(&mut self, tab_id: TabId, window_id: WindowId, index: usize);
    fn collection(&self) -> &FavoriteCollection;
}

/// Favorite store backed by a shared [`KeyValueStore`].
pub struct FavoriteStore {
    storage: Arc<dyn KeyValueStore>,
    collection: FavoriteCollection,
}

impl FavoriteStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            collection: FavoriteCollection::new(),
        }
    }

    /// Mutable access for reconciliation passes, which rewrite records in place.
    pub fn records_mut(&mut self) -> &mut Vec<FavoriteRecord> {
        &mut self.collection.records
    }

    /// Drops every record of `window_id` from the working copy and returns them.
    pub fn remove_window(&mut self, window_id: WindowId) -> Vec<FavoriteRecord> {
        let (removed, kept): (Vec<FavoriteRecord>, Vec<FavoriteRecord>) = self
            .collection
            .records
            .drain(..)
            .partition(|r| r.window_id == window_id);
        self.collection.records = kept;
        removed
    }
}

#[async_trait(?Send)]
impl FavoriteStoreTrait for FavoriteStore {
    /// Absent or malformed data loads as an empty collection. Substrate
    /// failures are returned and leave the working copy as it was.
    async fn load(&mut self) -> Result<(), StorageError> {
        let loaded = match self.storage.get(FAVORITE_TABS_KEY).await {
            Ok(Some(value)) => match serde_json::from_value::<FavoriteCollection>(value) {
                Ok(collection) => collection,
                Err(e) => {
                    warn!(error = %e, "stored favorites are malformed, starting empty");
                    FavoriteCollection::new()
                }
            },
            Ok(None) => FavoriteCollection::new(),
            Err(StorageError::SerializationError(e)) => {
                warn!(error = %e, "stored favorites are not valid JSON, starting empty");
                FavoriteCollection::new()
            }
            Err(e) => return Err(e),
        };
        debug!(count = loaded.len(), "favorites loaded");
        self.collection = loaded;
        Ok(())
    }

    async fn save(&self) -> Result<(), StorageError> {
        let value = serde_json::to_value(&self.collection)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.storage.set(FAVORITE_TABS_KEY, value).await?;
        debug!(count = self.collection.len(), "favorites saved");
        Ok(())
    }

    fn is_favorite(&self, tab_id: TabId, window_id: WindowId) -> bool {
        self.collection.contains(tab_id, window_id)
    }

    fn remove(&mut self, tab_id: TabId, window_id: WindowId) {
        self.collection.remove(tab_id, window_id);
    }

    /// Appends without checking for an existing record; callers toggle.
    fn add(&mut self, tab_id: TabId, window_id: WindowId, index: usize) {
        self.collection
            .push(FavoriteRecord::new(tab_id, window_id, index));
    }

    fn collection(&self) -> &FavoriteCollection {
        &self.collection
    }
}
