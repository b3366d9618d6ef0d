//! Boundary to the host tab system.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::types::errors::HostError;
use crate::types::tab::{LiveTab, TabId, WindowId};

/// What a window agent may ask of the host tab system.
#[async_trait(?Send)]
pub trait TabHost {
    /// Tabs of the window in strip order.
    async fn query_tabs(&self, window_id: WindowId) -> Result<Vec<LiveTab>, HostError>;
    async fn active_tab(&self, window_id: WindowId) -> Result<Option<LiveTab>, HostError>;
    async fn activate_tab(&self, tab_id: TabId) -> Result<(), HostError>;
}

/// [`TabManager`] shared between the harness that drives it and the agents
/// that query it.
#[derive(Clone, Default)]
pub struct SharedTabManager {
    inner: Arc<Mutex<TabManager>>,
}

impl SharedTabManager {
    pub fn new(manager: TabManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Locks the manager for direct manipulation. Never hold the guard across
    /// an `.await`.
    pub fn lock(&self) -> Result<MutexGuard<'_, TabManager>, HostError> {
        self.inner
            .lock()
            .map_err(|e| HostError::Unavailable(e.to_string()))
    }
}

#[async_trait(?Send)]
impl TabHost for SharedTabManager {
    async fn query_tabs(&self, window_id: WindowId) -> Result<Vec<LiveTab>, HostError> {
        Ok(self.lock()?.live_tabs(window_id)?)
    }

    async fn active_tab(&self, window_id: WindowId) -> Result<Option<LiveTab>, HostError> {
        Ok(self.lock()?.active_tab(window_id)?)
    }

    async fn activate_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        Ok(self.lock()?.switch_tab(tab_id)?)
    }
}
