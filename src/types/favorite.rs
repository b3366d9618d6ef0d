use serde::{Deserialize, Serialize};

use super::tab::{TabId, WindowId};

/// Storage key under which the whole favorite collection is persisted.
pub const FAVORITE_TABS_KEY: &str = "favoriteTabs";

/// One tab marked as favorite.
///
/// Serialized as `{ "id": .., "index": .., "windowId": .. }`, the shape every
/// window agent reads and writes in the shared store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteRecord {
    #[serde(rename = "id")]
    pub tab_id: TabId,
    pub index: usize,
    #[serde(rename = "windowId")]
    pub window_id: WindowId,
}

impl FavoriteRecord {
    pub fn new(tab_id: TabId, window_id: WindowId, index: usize) -> Self {
        Self {
            tab_id,
            index,
            window_id,
        }
    }

    pub fn matches(&self, tab_id: TabId, window_id: WindowId) -> bool {
        self.tab_id == tab_id && self.window_id == window_id
    }
}

/// The full persisted set of favorites across all windows.
///
/// Order carries no meaning. The collection is always read and written whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FavoriteCollection {
    pub records: Vec<FavoriteRecord>,
}

impl FavoriteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tab_id: TabId, window_id: WindowId) -> bool {
        self.records.iter().any(|r| r.matches(tab_id, window_id))
    }

    /// Removes every record for the pair. Returns how many were dropped.
    pub fn remove(&mut self, tab_id: TabId, window_id: WindowId) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !r.matches(tab_id, window_id));
        before - self.records.len()
    }

    pub fn push(&mut self, record: FavoriteRecord) {
        self.records.push(record);
    }

    pub fn in_window(&self, window_id: WindowId) -> impl Iterator<Item = &FavoriteRecord> {
        self.records.iter().filter(move |r| r.window_id == window_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
