//! Window agent.
//!
//! One [`WindowAgent`] runs per browser window. It owns that window's favorite
//! store handle and registration state, and is the event dispatcher: host
//! events come in through [`WindowAgent::handle_event`], get routed to the
//! store, the reconciliation and navigation engines and the collaborator
//! side-channel, and every failure is logged and swallowed there.
//!
//! All agents of a browser share the same [`KeyValueStore`]; nothing
//! coordinates them beyond reloading before every mutation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::managers::favorite_store::{FavoriteStore, FavoriteStoreTrait};
use crate::services::messaging::Messenger;
use crate::services::navigation;
use crate::services::reconciliation;
use crate::services::registration::{Registration, RegistrationOutcome, RegistrationState};
use crate::services::settings_engine::load_favorite_settings;
use crate::services::storage_local::KeyValueStore;
use crate::services::tab_host::TabHost;
use crate::types::errors::AgentError;
use crate::types::event::{Command, Direction, HostEvent};
use crate::types::favorite::FavoriteRecord;
use crate::types::message::{InboundMessage, StateAction};
use crate::types::settings::{AgentConfig, FavoriteSettings};
use crate::types::tab::{LiveTab, MoveInfo, RemoveInfo, TabId, WindowId};

/// What a toggle did to the tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

pub struct WindowAgent {
    window_id: WindowId,
    store: FavoriteStore,
    settings: FavoriteSettings,
    registration: Registration,
    storage: Arc<dyn KeyValueStore>,
    host: Arc<dyn TabHost>,
    messenger: Arc<dyn Messenger>,
}

impl WindowAgent {
    pub fn new(
        window_id: WindowId,
        config: &AgentConfig,
        storage: Arc<dyn KeyValueStore>,
        host: Arc<dyn TabHost>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            window_id,
            store: FavoriteStore::new(storage.clone()),
            settings: FavoriteSettings::default(),
            registration: Registration::new(config),
            storage,
            host,
            messenger,
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn registration_state(&self) -> RegistrationState {
        self.registration.state()
    }

    pub fn settings(&self) -> &FavoriteSettings {
        &self.settings
    }

    /// Checks the working copy as of the last load.
    pub fn is_favorite(&self, tab_id: TabId, window_id: WindowId) -> bool {
        self.store.is_favorite(tab_id, window_id)
    }

    /// Loads settings and favorites, then makes the first registration attempt.
    pub async fn start(&mut self) -> RegistrationOutcome {
        info!(window_id = self.window_id, "window agent starting");
        self.settings = load_favorite_settings(self.storage.as_ref()).await;
        if let Err(e) = self.store.load().await {
            warn!(window_id = self.window_id, error = %e, "initial favorites load failed");
        }
        self.register("startup").await
    }

    /// Runs the registration sequence. On the transition to `Registered` the
    /// tab ids are remapped and this window's favorites are replayed to the
    /// collaborator. Calling it while registered sends nothing.
    pub async fn register(&mut self, trigger: &str) -> RegistrationOutcome {
        let style = self.settings.registration_style();
        let outcome = self
            .registration
            .register(self.messenger.as_ref(), &style, trigger)
            .await;

        if outcome == RegistrationOutcome::Registered {
            if let Err(e) =
                reconciliation::remap_tab_ids(&mut self.store, self.host.as_ref(), self.window_id).await
            {
                warn!(window_id = self.window_id, error = %e, "tab id remap failed");
            }
            let replayed = self.replay_favorites().await;
            debug!(window_id = self.window_id, replayed, "favorite state replayed");
        }
        outcome
    }

    /// Sends `add-tab-state` for every favorite of this window in the working
    /// copy. Returns how many were accepted.
    async fn replay_favorites(&self) -> usize {
        let tab_ids: Vec<TabId> = self
            .store
            .collection()
            .in_window(self.window_id)
            .map(|r| r.tab_id)
            .collect();

        let mut accepted = 0;
        for tab_id in tab_ids {
            match self
                .registration
                .notify(self.messenger.as_ref(), StateAction::Add, tab_id)
                .await
            {
                Ok(()) => accepted += 1,
                Err(e) => debug!(tab_id, error = %e, "replay message not delivered"),
            }
        }
        accepted
    }

    /// Entry point for everything the host delivers.
    ///
    /// External messages are always decoded. Tab events and commands are only
    /// acted on once registered.
    pub async fn handle_event(&mut self, event: HostEvent) {
        let window_id = self.window_id;
        match event {
            HostEvent::ExternalMessage { sender, payload } => {
                match InboundMessage::decode(self.registration.collaborator_id(), &sender, &payload) {
                    Ok(InboundMessage::Ready) => {
                        self.register("ready").await;
                    }
                    Err(e) => warn!(window_id, sender = %sender, error = %e, "rejected external message"),
                }
            }
            event if !self.registration.is_registered() => {
                debug!(window_id, ?event, "not registered, ignoring event");
            }
            HostEvent::TabActivated { window_id: tab_window, .. } if tab_window != window_id => {
                debug!(window_id, tab_window, "activation in another window, ignoring");
            }
            HostEvent::TabActivated { tab_id, window_id: tab_window } => {
                if let Err(e) = self.on_tab_activated(tab_id, tab_window).await {
                    warn!(window_id, tab_id, error = %e, "tab activation handling failed");
                }
            }
            HostEvent::TabRemoved { tab_id, info } => {
                if let Err(e) = self.on_tab_removed(tab_id, &info).await {
                    warn!(window_id, tab_id, error = %e, "tab removal handling failed");
                }
            }
            HostEvent::TabMoved { tab_id, info } => {
                if let Err(e) = self.on_tab_moved(tab_id, &info).await {
                    warn!(window_id, tab_id, error = %e, "tab move handling failed");
                }
            }
            HostEvent::Command(command) => {
                if let Err(e) = self.handle_command(command).await {
                    warn!(window_id, %command, error = %e, "command failed");
                }
            }
        }
    }

    /// Resolves a command against this window's active tab.
    pub async fn handle_command(&mut self, command: Command) -> Result<(), AgentError> {
        debug!(window_id = self.window_id, %command, "command received");
        let Some(current) = self.host.active_tab(self.window_id).await? else {
            debug!(window_id = self.window_id, "no active tab, command ignored");
            return Ok(());
        };

        match command.direction() {
            None => {
                self.toggle_favorite(&current).await?;
            }
            Some(direction) => {
                self.activate_nearest_favorite(current.id, direction).await?;
            }
        }
        Ok(())
    }

    /// Marks the tab favorite if it is not, unmarks it otherwise, and tells
    /// the collaborator.
    pub async fn toggle_favorite(&mut self, tab: &LiveTab) -> Result<ToggleOutcome, AgentError> {
        self.store.load().await?;
        let outcome = if self.store.is_favorite(tab.id, tab.window_id) {
            self.store.remove(tab.id, tab.window_id);
            ToggleOutcome::Removed
        } else {
            self.store.add(tab.id, tab.window_id, tab.index);
            ToggleOutcome::Added
        };
        self.store.save().await?;

        let action = match outcome {
            ToggleOutcome::Added => StateAction::Add,
            ToggleOutcome::Removed => StateAction::Remove,
        };
        if let Err(e) = self
            .registration
            .notify(self.messenger.as_ref(), action, tab.id)
            .await
        {
            warn!(tab_id = tab.id, error = %e, "favorite state not delivered");
        }

        info!(tab_id = tab.id, window_id = tab.window_id, ?outcome, "favorite toggled");
        Ok(outcome)
    }

    pub async fn activate_nearest_favorite(
        &mut self,
        current: TabId,
        direction: Direction,
    ) -> Result<Option<TabId>, AgentError> {
        navigation::activate_nearest_favorite(
            &mut self.store,
            self.host.as_ref(),
            self.window_id,
            current,
            direction,
        )
        .await
    }

    /// Flashes the tab if it is a favorite. Returns whether it flashed.
    pub async fn on_tab_activated(&mut self, tab_id: TabId, window_id: WindowId) -> Result<bool, AgentError> {
        self.store.load().await?;
        if !self.store.is_favorite(tab_id, window_id) {
            return Ok(false);
        }
        self.registration.flash(self.messenger.as_ref(), tab_id).await?;
        Ok(true)
    }

    /// Forgets a closed favorite. Tabs closed as part of a window close keep
    /// their record. Returns whether a record was removed.
    pub async fn on_tab_removed(&mut self, tab_id: TabId, info: &RemoveInfo) -> Result<bool, AgentError> {
        if info.is_window_closing {
            return Ok(false);
        }

        self.store.load().await?;
        if !self.store.is_favorite(tab_id, info.window_id) {
            return Ok(false);
        }
        self.store.remove(tab_id, info.window_id);
        self.store.save().await?;

        debug!(tab_id, window_id = info.window_id, "closed tab removed from favorites");
        Ok(true)
    }

    /// Re-derives stored indexes after any tab move.
    pub async fn on_tab_moved(&mut self, tab_id: TabId, info: &MoveInfo) -> Result<usize, AgentError> {
        debug!(
            tab_id,
            window_id = info.window_id,
            from = info.from_index,
            to = info.to_index,
            "tab moved"
        );
        reconciliation::remap_tab_indexes(&mut self.store, self.host.as_ref(), self.window_id).await
    }

    /// Unmarks every favorite of this window. Returns the cleared tab ids.
    /// Does nothing until registered.
    pub async fn clear_favorites(&mut self) -> Result<Vec<TabId>, AgentError> {
        if !self.registration.is_registered() {
            debug!(window_id = self.window_id, "not registered, clear ignored");
            return Ok(Vec::new());
        }
        self.store.load().await?;
        let removed = self.store.remove_window(self.window_id);
        if removed.is_empty() {
            return Ok(Vec::new());
        }
        self.store.save().await?;

        let tab_ids: Vec<TabId> = removed.iter().map(|r| r.tab_id).collect();
        for tab_id in &tab_ids {
            if let Err(e) = self
                .registration
                .notify(self.messenger.as_ref(), StateAction::Remove, *tab_id)
                .await
            {
                warn!(tab_id, error = %e, "favorite state not delivered");
            }
        }
        info!(window_id = self.window_id, count = tab_ids.len(), "window favorites cleared");
        Ok(tab_ids)
    }

    /// Freshly loaded favorites of this window.
    pub async fn favorites_in_window(&mut self) -> Result<Vec<FavoriteRecord>, AgentError> {
        self.store.load().await?;
        Ok(self
            .store
            .collection()
            .in_window(self.window_id)
            .cloned()
            .collect())
    }
}
