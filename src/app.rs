//! Multi-window simulation.
//!
//! Wires an in-memory browser ([`TabManager`]) to one [`WindowAgent`] per
//! window, a shared SQLite-backed local store and an in-process collaborator,
//! and forwards host notifications to the agents the way a browser would:
//! tab events go to every agent, commands to the focused window's agent.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::agent::WindowAgent;
use crate::database::connection::Database;
use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::services::messaging::RecordingMessenger;
use crate::services::storage_local::SqliteStorage;
use crate::services::tab_host::SharedTabManager;
use crate::types::errors::HostError;
use crate::types::event::{Command, HostEvent};
use crate::types::settings::AgentConfig;
use crate::types::tab::{MoveInfo, RemoveInfo, TabId, WindowId};

pub struct App {
    pub db: Arc<Database>,
    pub storage: SqliteStorage,
    pub tabs: SharedTabManager,
    pub collaborator: RecordingMessenger,
    pub config: AgentConfig,
    agents: BTreeMap<WindowId, WindowAgent>,
}

impl App {
    /// Creates a simulation backed by the SQLite file at `db_path`, with the
    /// collaborator installed and listening.
    pub fn new(db_path: &str, config: AgentConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self::with_database(db, config))
    }

    pub fn in_memory(config: AgentConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open_in_memory()?);
        Ok(Self::with_database(db, config))
    }

    fn with_database(db: Arc<Database>, config: AgentConfig) -> Self {
        Self {
            storage: SqliteStorage::new(db.clone()),
            db,
            tabs: SharedTabManager::new(TabManager::new()),
            collaborator: RecordingMessenger::available(),
            config,
            agents: BTreeMap::new(),
        }
    }

    pub fn agent(&self, window_id: WindowId) -> Option<&WindowAgent> {
        self.agents.get(&window_id)
    }

    pub fn agent_mut(&mut self, window_id: WindowId) -> Option<&mut WindowAgent> {
        self.agents.get_mut(&window_id)
    }

    fn spawn_agent(&self, window_id: WindowId) -> WindowAgent {
        WindowAgent::new(
            window_id,
            &self.config,
            Arc::new(self.storage.clone()),
            Arc::new(self.tabs.clone()),
            Arc::new(self.collaborator.clone()),
        )
    }

    async fn broadcast(&mut self, event: HostEvent) {
        for agent in self.agents.values_mut() {
            agent.handle_event(event.clone()).await;
        }
    }

    /// Opens a window with one blank tab and starts its agent.
    pub async fn open_window(&mut self) -> Result<WindowId, HostError> {
        let window_id = {
            let mut tabs = self.tabs.lock()?;
            let window_id = tabs.open_window();
            tabs.create_tab(window_id, None, true)?;
            window_id
        };
        let mut agent = self.spawn_agent(window_id);
        agent.start().await;
        self.agents.insert(window_id, agent);
        Ok(window_id)
    }

    pub async fn close_window(&mut self, window_id: WindowId) -> Result<(), HostError> {
        let removed = self.tabs.lock()?.close_window(window_id)?;
        self.agents.remove(&window_id);
        for (tab_id, info) in removed {
            self.broadcast(HostEvent::TabRemoved { tab_id, info }).await;
        }
        Ok(())
    }

    pub fn focus_window(&mut self, window_id: WindowId) -> Result<(), HostError> {
        Ok(self.tabs.lock()?.focus_window(window_id)?)
    }

    pub async fn create_tab(
        &mut self,
        window_id: WindowId,
        url: Option<&str>,
        active: bool,
    ) -> Result<TabId, HostError> {
        let (tab_id, became_active) = {
            let mut tabs = self.tabs.lock()?;
            let tab_id = tabs.create_tab(window_id, url, active)?;
            let became_active = tabs.active_tab(window_id)?.map(|t| t.id) == Some(tab_id);
            (tab_id, became_active)
        };
        if became_active {
            self.broadcast(HostEvent::TabActivated { tab_id, window_id }).await;
        }
        Ok(tab_id)
    }

    pub async fn activate_tab(&mut self, tab_id: TabId) -> Result<(), HostError> {
        let window_id = {
            let mut tabs = self.tabs.lock()?;
            tabs.switch_tab(tab_id)?;
            tabs.get_tab(tab_id).map(|t| t.window_id).ok_or(HostError::TabNotFound(tab_id))?
        };
        self.broadcast(HostEvent::TabActivated { tab_id, window_id }).await;
        Ok(())
    }

    pub async fn move_tab(&mut self, tab_id: TabId, new_index: usize) -> Result<MoveInfo, HostError> {
        let info = self.tabs.lock()?.move_tab(tab_id, new_index)?;
        self.broadcast(HostEvent::TabMoved {
            tab_id,
            info: info.clone(),
        })
        .await;
        Ok(info)
    }

    /// Closes a tab. Closing the last tab of a window also stops that
    /// window's agent.
    pub async fn close_tab(&mut self, tab_id: TabId) -> Result<RemoveInfo, HostError> {
        let info = self.tabs.lock()?.close_tab(tab_id)?;
        if info.is_window_closing {
            self.agents.remove(&info.window_id);
        }
        self.broadcast(HostEvent::TabRemoved {
            tab_id,
            info: info.clone(),
        })
        .await;
        Ok(info)
    }

    /// Delivers a command to the focused window's agent. If the command
    /// changed the active tab, the activation is reported like any other.
    pub async fn run_command(&mut self, command: Command) -> Result<(), HostError> {
        let Some(window_id) = self.tabs.lock()?.focused_window() else {
            debug!(%command, "no focused window, command dropped");
            return Ok(());
        };
        let before = self.tabs.lock()?.active_tab(window_id)?.map(|t| t.id);

        if let Some(agent) = self.agents.get_mut(&window_id) {
            agent.handle_event(HostEvent::Command(command)).await;
        }

        let after = self.tabs.lock()?.active_tab(window_id)?.map(|t| t.id);
        if let Some(tab_id) = after.filter(|id| Some(*id) != before) {
            self.broadcast(HostEvent::TabActivated { tab_id, window_id }).await;
        }
        Ok(())
    }

    /// Simulates a browser restart: agents stop, every tab gets a new id, and
    /// a fresh agent starts for each window. Returns `(old, new)` id pairs.
    pub async fn restart(&mut self) -> Result<Vec<(TabId, TabId)>, HostError> {
        self.agents.clear();
        let (remapped, windows) = {
            let mut tabs = self.tabs.lock()?;
            (tabs.restart(), tabs.window_ids())
        };
        for window_id in windows {
            let mut agent = self.spawn_agent(window_id);
            agent.start().await;
            self.agents.insert(window_id, agent);
        }
        Ok(remapped)
    }

    /// Delivers a message from another extension to every agent.
    pub async fn deliver_external(&mut self, sender: &str, payload: Value) {
        self.broadcast(HostEvent::ExternalMessage {
            sender: sender.to_string(),
            payload,
        })
        .await;
    }

    /// The collaborator comes up and announces it is ready.
    pub async fn collaborator_ready(&mut self) {
        self.collaborator.set_available(true);
        let sender = self.config.collaborator_id.clone();
        self.deliver_external(&sender, json!({"type": "ready"})).await;
    }
}
