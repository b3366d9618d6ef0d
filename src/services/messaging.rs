//! Cross-extension messaging.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::types::errors::MessagingError;
use crate::types::message::OutboundMessage;

/// Request/response channel to another extension.
#[async_trait(?Send)]
pub trait Messenger {
    /// Sends `message` to the extension `target` and returns its reply.
    ///
    /// Fails with `MessagingError::Unavailable` if nobody is listening and
    /// `MessagingError::Rejected` if the receiver answered with an error.
    async fn send_message(&self, target: &str, message: &OutboundMessage) -> Result<Value, MessagingError>;
}

/// A message accepted by [`RecordingMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub target: String,
    pub message: OutboundMessage,
}

#[derive(Debug, Default)]
struct Outbox {
    available: bool,
    rejecting: bool,
    sent: Vec<SentMessage>,
}

/// In-process collaborator that acknowledges every message while available
/// and records what it received. While rejecting, it answers every message
/// with an error and records nothing.
#[derive(Clone, Default)]
pub struct RecordingMessenger {
    outbox: Arc<Mutex<Outbox>>,
}

impl RecordingMessenger {
    /// A collaborator that is installed and listening.
    pub fn available() -> Self {
        let messenger = Self::default();
        messenger.set_available(true);
        messenger
    }

    /// A collaborator that is absent until [`set_available`](Self::set_available).
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.available = available;
        }
    }

    pub fn set_rejecting(&self, rejecting: bool) {
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.rejecting = rejecting;
        }
    }

    pub fn is_available(&self) -> bool {
        self.outbox.lock().map(|o| o.available).unwrap_or(false)
    }

    /// Copies of everything received so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.outbox.lock().map(|o| o.sent.clone()).unwrap_or_default()
    }

    /// Drains everything received so far.
    pub fn take_sent(&self) -> Vec<SentMessage> {
        self.outbox
            .lock()
            .map(|mut o| std::mem::take(&mut o.sent))
            .unwrap_or_default()
    }
}

#[async_trait(?Send)]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, target: &str, message: &OutboundMessage) -> Result<Value, MessagingError> {
        let mut outbox = self
            .outbox
            .lock()
            .map_err(|e| MessagingError::Unavailable(e.to_string()))?;
        if !outbox.available {
            return Err(MessagingError::Unavailable(target.to_string()));
        }
        if outbox.rejecting {
            debug!(to = target, kind = message.kind(), "collaborator rejected message");
            return Err(MessagingError::Rejected(format!(
                "{} refused {}",
                target,
                message.kind()
            )));
        }
        debug!(to = target, kind = message.kind(), "collaborator received message");
        outbox.sent.push(SentMessage {
            target: target.to_string(),
            message: message.clone(),
        });
        Ok(json!(true))
    }
}
