use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier. Only stable within one browser session.
pub type TabId = i64;

/// Host-assigned window identifier. Stable for the lifetime of the window.
pub type WindowId = i64;

/// A tab as currently reported by the host tab system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LiveTab {
    pub id: TabId,
    #[serde(rename = "windowId")]
    pub window_id: WindowId,
    pub index: usize,
    pub active: bool,
}

/// Removal notification as delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoveInfo {
    #[serde(rename = "windowId")]
    pub window_id: WindowId,
    #[serde(rename = "isWindowClosing")]
    pub is_window_closing: bool,
}

/// Move notification as delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveInfo {
    #[serde(rename = "windowId")]
    pub window_id: WindowId,
    #[serde(rename = "fromIndex")]
    pub from_index: usize,
    #[serde(rename = "toIndex")]
    pub to_index: usize,
}

/// A tab held by the in-memory host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    pub window_id: WindowId,
    pub url: String,
}
