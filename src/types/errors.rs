use std::fmt;

use super::tab::{TabId, WindowId};

// === TabError ===

/// Errors related to the in-memory tab strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabError {
    /// Tab with the given ID was not found.
    NotFound(TabId),
    /// Window with the given ID was not found.
    WindowNotFound(WindowId),
    /// The provided tab index is out of bounds.
    InvalidIndex(usize),
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabError::NotFound(id) => write!(f, "Tab not found: {}", id),
            TabError::WindowNotFound(id) => write!(f, "Window not found: {}", id),
            TabError::InvalidIndex(index) => write!(f, "Invalid tab index: {}", index),
        }
    }
}

impl std::error::Error for TabError {}

// === StorageError ===

/// Errors from the persisted key-value substrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// A value could not be serialized for storage.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

// === HostError ===

/// Errors returned by the host tab system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The tab does not exist (any more).
    TabNotFound(TabId),
    /// The window does not exist (any more).
    WindowNotFound(WindowId),
    /// The host could not be reached.
    Unavailable(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::TabNotFound(id) => write!(f, "Host tab not found: {}", id),
            HostError::WindowNotFound(id) => write!(f, "Host window not found: {}", id),
            HostError::Unavailable(msg) => write!(f, "Host unavailable: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}

impl From<TabError> for HostError {
    fn from(e: TabError) -> Self {
        match e {
            TabError::NotFound(id) => HostError::TabNotFound(id),
            TabError::WindowNotFound(id) => HostError::WindowNotFound(id),
            TabError::InvalidIndex(_) => HostError::Unavailable(e.to_string()),
        }
    }
}

// === MessagingError ===

/// Errors from sending a message to another extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagingError {
    /// The receiver is not installed or not listening yet.
    Unavailable(String),
    /// The receiver answered with an error.
    Rejected(String),
}

impl fmt::Display for MessagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagingError::Unavailable(target) => {
                write!(f, "Message receiver unavailable: {}", target)
            }
            MessagingError::Rejected(msg) => write!(f, "Message rejected: {}", msg),
        }
    }
}

impl std::error::Error for MessagingError {}

// === ProtocolError ===

/// Errors decoding or encoding collaborator messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The message came from an extension other than the collaborator.
    UnexpectedSender(String),
    /// The message `type` is not part of the contract.
    UnknownType(String),
    /// The payload does not have the expected shape.
    Malformed(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnexpectedSender(sender) => {
                write!(f, "Unexpected message sender: {}", sender)
            }
            ProtocolError::UnknownType(kind) => write!(f, "Unknown message type: {}", kind),
            ProtocolError::Malformed(msg) => write!(f, "Malformed message: {}", msg),
        }
    }
}

impl std::error::Error for ProtocolError {}

// === ConfigError ===

/// Errors related to the agent configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading or writing the config file.
    IoError(String),
    /// Failed to serialize or deserialize the config file.
    SerializationError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::SerializationError(msg) => {
                write!(f, "Config serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// === AgentError ===

/// Any failure a window agent operation can run into.
///
/// These never leave the agent's event dispatcher; they are logged there and
/// turned into no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    Storage(StorageError),
    Host(HostError),
    Messaging(MessagingError),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Storage(e) => write!(f, "{}", e),
            AgentError::Host(e) => write!(f, "{}", e),
            AgentError::Messaging(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AgentError {}

impl From<StorageError> for AgentError {
    fn from(e: StorageError) -> Self {
        AgentError::Storage(e)
    }
}

impl From<HostError> for AgentError {
    fn from(e: HostError) -> Self {
        AgentError::Host(e)
    }
}

impl From<MessagingError> for AgentError {
    fn from(e: MessagingError) -> Self {
        AgentError::Messaging(e)
    }
}
