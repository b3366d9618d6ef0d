//! Registration handshake with the styling collaborator.
//!
//! An agent starts `Unregistered`. A `register-self` exchange that gets any
//! non-error reply moves it to `Registered`; a failed exchange leaves it where
//! it was and is not retried until the collaborator announces `ready`.
//! Registering again while `Registered` sends nothing.
//!
//! The same channel carries the favorite-state side messages: a single
//! add/remove on toggle, and a remove-then-add flash when an already favorite
//! tab is activated again.

use std::time::Duration;

use tracing::{debug, info};

use crate::services::messaging::Messenger;
use crate::types::errors::MessagingError;
use crate::types::message::{OutboundMessage, StateAction};
use crate::types::settings::AgentConfig;
use crate::types::tab::TabId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    Registered,
}

/// Result of one registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The exchange succeeded and the state just became `Registered`.
    Registered,
    /// Already `Registered`; nothing was sent.
    AlreadyRegistered,
    /// The exchange failed; the state stays `Unregistered`.
    Deferred(MessagingError),
}

/// Per-agent handshake state plus the collaborator addressing it needs.
#[derive(Debug, Clone)]
pub struct Registration {
    state: RegistrationState,
    extension_id: String,
    collaborator_id: String,
    flash_delay: Duration,
}

impl Registration {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            state: RegistrationState::Unregistered,
            extension_id: config.extension_id.clone(),
            collaborator_id: config.collaborator_id.clone(),
            flash_delay: Duration::from_millis(config.flash_delay_ms),
        }
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    pub fn is_registered(&self) -> bool {
        self.state == RegistrationState::Registered
    }

    pub fn collaborator_id(&self) -> &str {
        &self.collaborator_id
    }

    /// Runs the `register-self` exchange unless already registered.
    /// `trigger` only labels the attempt in logs.
    pub async fn register(
        &mut self,
        messenger: &dyn Messenger,
        style: &str,
        trigger: &str,
    ) -> RegistrationOutcome {
        if self.is_registered() {
            debug!(trigger, "already registered with collaborator");
            return RegistrationOutcome::AlreadyRegistered;
        }

        debug!(trigger, collaborator = %self.collaborator_id, "registering with collaborator");
        let request = OutboundMessage::register_self(self.extension_id.clone(), style);
        match messenger.send_message(&self.collaborator_id, &request).await {
            Ok(_) => {
                self.state = RegistrationState::Registered;
                info!(trigger, collaborator = %self.collaborator_id, "registered with collaborator");
                RegistrationOutcome::Registered
            }
            Err(e) => {
                debug!(trigger, error = %e, "collaborator not ready, registration deferred");
                RegistrationOutcome::Deferred(e)
            }
        }
    }

    /// Marks or unmarks one tab.
    pub async fn notify(
        &self,
        messenger: &dyn Messenger,
        action: StateAction,
        tab_id: TabId,
    ) -> Result<(), MessagingError> {
        let message = OutboundMessage::tab_state(action, tab_id);
        messenger.send_message(&self.collaborator_id, &message).await?;
        Ok(())
    }

    /// Clears and re-applies the mark so the collaborator redraws it.
    pub async fn flash(&self, messenger: &dyn Messenger, tab_id: TabId) -> Result<(), MessagingError> {
        self.notify(messenger, StateAction::Remove, tab_id).await?;
        tokio::time::sleep(self.flash_delay).await;
        self.notify(messenger, StateAction::Add, tab_id).await
    }
}
