use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::tab::{MoveInfo, RemoveInfo, TabId, WindowId};

/// Direction of a favorite search through the tab strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards higher indexes, wrapping to the first tab.
    Forward,
    /// Towards lower indexes, wrapping to the last tab.
    Backward,
}

/// Keyboard commands delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleFavorite,
    NextFavoriteUp,
    NextFavoriteDown,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::ToggleFavorite => "toggle-favorite",
            Command::NextFavoriteUp => "next-favorite-up",
            Command::NextFavoriteDown => "next-favorite-down",
        }
    }

    /// Search direction for navigation commands, `None` for toggling.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Command::ToggleFavorite => None,
            Command::NextFavoriteUp => Some(Direction::Backward),
            Command::NextFavoriteDown => Some(Direction::Forward),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a command name is not one this agent handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown command: {}", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toggle-favorite" => Ok(Command::ToggleFavorite),
            "next-favorite-up" => Ok(Command::NextFavoriteUp),
            "next-favorite-down" => Ok(Command::NextFavoriteDown),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

/// Everything the host can deliver to a window agent.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    TabActivated { tab_id: TabId, window_id: WindowId },
    TabRemoved { tab_id: TabId, info: RemoveInfo },
    TabMoved { tab_id: TabId, info: MoveInfo },
    Command(Command),
    /// Raw message from another extension, decoded by the agent.
    ExternalMessage { sender: String, payload: Value },
}
