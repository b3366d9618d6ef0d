//! Message contract with the styling collaborator.
//!
//! Outbound messages are a closed set of `type`-tagged variants. Inbound
//! messages are decoded explicitly and anything unrecognized is rejected
//! with a [`ProtocolError`] instead of being dropped silently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ProtocolError;
use super::tab::TabId;

/// Visual state this agent toggles on tabs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TabState {
    #[serde(rename = "favorite-tab")]
    FavoriteTab,
}

/// Whether a state change adds or clears the mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateAction {
    Add,
    Remove,
}

/// Messages sent to the collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundMessage {
    RegisterSelf { name: String, style: String },
    AddTabState { tabs: Vec<TabId>, state: TabState },
    RemoveTabState { tabs: Vec<TabId>, state: TabState },
}

impl OutboundMessage {
    pub fn register_self(name: impl Into<String>, style: impl Into<String>) -> Self {
        OutboundMessage::RegisterSelf {
            name: name.into(),
            style: style.into(),
        }
    }

    pub fn tab_state(action: StateAction, tab_id: TabId) -> Self {
        let tabs = vec![tab_id];
        let state = TabState::FavoriteTab;
        match action {
            StateAction::Add => OutboundMessage::AddTabState { tabs, state },
            StateAction::Remove => OutboundMessage::RemoveTabState { tabs, state },
        }
    }

    /// Wire name of the message, as carried in its `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundMessage::RegisterSelf { .. } => "register-self",
            OutboundMessage::AddTabState { .. } => "add-tab-state",
            OutboundMessage::RemoveTabState { .. } => "remove-tab-state",
        }
    }

    pub fn encode(&self) -> Result<Value, ProtocolError> {
        serde_json::to_value(self).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}

/// Messages accepted from the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// The collaborator finished (re)starting and accepts registrations.
    Ready,
}

impl InboundMessage {
    /// Decodes a message delivered by `sender`.
    ///
    /// Only messages whose sender is `collaborator_id` are accepted.
    pub fn decode(
        collaborator_id: &str,
        sender: &str,
        payload: &Value,
    ) -> Result<Self, ProtocolError> {
        if sender != collaborator_id {
            return Err(ProtocolError::UnexpectedSender(sender.to_string()));
        }

        let kind = payload
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProtocolError::Malformed("missing string field 'type'".to_string()))?;

        match kind {
            "ready" => Ok(InboundMessage::Ready),
            other => Err(ProtocolError::UnknownType(other.to_string())),
        }
    }
}
