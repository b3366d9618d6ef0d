//! In-memory host tab system.
//!
//! Models what the favorites agent needs from a browser: windows holding an
//! ordered strip of tabs with integer ids, one active tab per window, one
//! focused window, moves, closes, and a restart that hands every tab a fresh
//! id while keeping windows and ordering intact.

use crate::types::errors::TabError;
use crate::types::tab::{LiveTab, MoveInfo, RemoveInfo, Tab, TabId, WindowId};

/// Trait defining the tab management interface.
pub trait TabManagerTrait {
    fn open_window(&mut self) -> WindowId;
    fn close_window(&mut self, window_id: WindowId) -> Result<Vec<(TabId, RemoveInfo)>, TabError>;
    fn focus_window(&mut self, window_id: WindowId) -> Result<(), TabError>;
    fn focused_window(&self) -> Option<WindowId>;
    fn window_ids(&self) -> Vec<WindowId>;
    fn create_tab(&mut self, window_id: WindowId, url: Option<&str>, active: bool) -> Result<TabId, TabError>;
    fn close_tab(&mut self, tab_id: TabId) -> Result<RemoveInfo, TabError>;
    fn switch_tab(&mut self, tab_id: TabId) -> Result<(), TabError>;
    fn move_tab(&mut self, tab_id: TabId, new_index: usize) -> Result<MoveInfo, TabError>;
    fn get_tab(&self, tab_id: TabId) -> Option<&Tab>;
    fn live_tabs(&self, window_id: WindowId) -> Result<Vec<LiveTab>, TabError>;
    fn active_tab(&self, window_id: WindowId) -> Result<Option<LiveTab>, TabError>;
    fn tab_count(&self) -> usize;
    fn restart(&mut self) -> Vec<(TabId, TabId)>;
}

#[derive(Debug, Clone)]
struct Window {
    id: WindowId,
    tab_order: Vec<TabId>,
    active_tab_id: Option<TabId>,
}

/// In-memory browser with any number of windows.
pub struct TabManager {
    tabs: Vec<Tab>,
    windows: Vec<Window>,
    focused_window: Option<WindowId>,
    next_tab_id: TabId,
    next_window_id: WindowId,
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            windows: Vec::new(),
            focused_window: None,
            next_tab_id: 1,
            next_window_id: 1,
        }
    }

    fn find_tab_index(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn window(&self, window_id: WindowId) -> Result<&Window, TabError> {
        self.windows
            .iter()
            .find(|w| w.id == window_id)
            .ok_or(TabError::WindowNotFound(window_id))
    }

    fn window_mut(&mut self, window_id: WindowId) -> Result<&mut Window, TabError> {
        self.windows
            .iter_mut()
            .find(|w| w.id == window_id)
            .ok_or(TabError::WindowNotFound(window_id))
    }

    fn allocate_tab_id(&mut self) -> TabId {
        let id = self.next_tab_id;
        self.next_tab_id += 1;
        id
    }

    fn live_tab(window: &Window, index: usize, tab_id: TabId) -> LiveTab {
        LiveTab {
            id: tab_id,
            window_id: window.id,
            index,
            active: window.active_tab_id == Some(tab_id),
        }
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManagerTrait for TabManager {
    /// Opens an empty window and focuses it.
    fn open_window(&mut self) -> WindowId {
        let id = self.next_window_id;
        self.next_window_id += 1;
        self.windows.push(Window {
            id,
            tab_order: Vec::new(),
            active_tab_id: None,
        });
        self.focused_window = Some(id);
        id
    }

    /// Closes a window with all its tabs. Every removal is flagged as part of
    /// a window close.
    fn close_window(&mut self, window_id: WindowId) -> Result<Vec<(TabId, RemoveInfo)>, TabError> {
        let pos = self
            .windows
            .iter()
            .position(|w| w.id == window_id)
            .ok_or(TabError::WindowNotFound(window_id))?;
        let window = self.windows.remove(pos);
        self.tabs.retain(|t| t.window_id != window_id);

        if self.focused_window == Some(window_id) {
            self.focused_window = self.windows.last().map(|w| w.id);
        }

        Ok(window
            .tab_order
            .into_iter()
            .map(|id| {
                (
                    id,
                    RemoveInfo {
                        window_id,
                        is_window_closing: true,
                    },
                )
            })
            .collect())
    }

    fn focus_window(&mut self, window_id: WindowId) -> Result<(), TabError> {
        self.window(window_id)?;
        self.focused_window = Some(window_id);
        Ok(())
    }

    fn focused_window(&self) -> Option<WindowId> {
        self.focused_window
    }

    fn window_ids(&self) -> Vec<WindowId> {
        self.windows.iter().map(|w| w.id).collect()
    }

    /// Appends a tab to the end of the window's strip.
    /// The first tab of a window always becomes active.
    fn create_tab(&mut self, window_id: WindowId, url: Option<&str>, active: bool) -> Result<TabId, TabError> {
        self.window(window_id)?;
        let id = self.allocate_tab_id();
        self.tabs.push(Tab {
            id,
            window_id,
            url: url.unwrap_or("about:blank").to_string(),
        });

        let window = self.window_mut(window_id)?;
        window.tab_order.push(id);
        if active || window.active_tab_id.is_none() {
            window.active_tab_id = Some(id);
        }
        Ok(id)
    }

    /// Closes a tab. If it was active, its nearest neighbor becomes active.
    /// Closing the last tab of a window closes the window too.
    fn close_tab(&mut self, tab_id: TabId) -> Result<RemoveInfo, TabError> {
        let tab_idx = self.find_tab_index(tab_id).ok_or(TabError::NotFound(tab_id))?;
        let window_id = self.tabs[tab_idx].window_id;

        if self.window(window_id)?.tab_order.len() == 1 {
            self.close_window(window_id)?;
            return Ok(RemoveInfo {
                window_id,
                is_window_closing: true,
            });
        }

        self.tabs.remove(tab_idx);
        let window = self.window_mut(window_id)?;
        let order_idx = window
            .tab_order
            .iter()
            .position(|id| *id == tab_id)
            .ok_or(TabError::NotFound(tab_id))?;
        window.tab_order.remove(order_idx);

        if window.active_tab_id == Some(tab_id) {
            let next = order_idx.min(window.tab_order.len() - 1);
            window.active_tab_id = Some(window.tab_order[next]);
        }

        Ok(RemoveInfo {
            window_id,
            is_window_closing: false,
        })
    }

    /// Activates a tab and focuses its window.
    fn switch_tab(&mut self, tab_id: TabId) -> Result<(), TabError> {
        let window_id = self.get_tab(tab_id).ok_or(TabError::NotFound(tab_id))?.window_id;
        self.window_mut(window_id)?.active_tab_id = Some(tab_id);
        self.focused_window = Some(window_id);
        Ok(())
    }

    /// Moves a tab to a new position in its window's strip.
    fn move_tab(&mut self, tab_id: TabId, new_index: usize) -> Result<MoveInfo, TabError> {
        let window_id = self.get_tab(tab_id).ok_or(TabError::NotFound(tab_id))?.window_id;
        let window = self.window_mut(window_id)?;

        if new_index >= window.tab_order.len() {
            return Err(TabError::InvalidIndex(new_index));
        }
        let from_index = window
            .tab_order
            .iter()
            .position(|id| *id == tab_id)
            .ok_or(TabError::NotFound(tab_id))?;

        let id = window.tab_order.remove(from_index);
        window.tab_order.insert(new_index, id);
        Ok(MoveInfo {
            window_id,
            from_index,
            to_index: new_index,
        })
    }

    fn get_tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    /// Tabs of a window in strip order.
    fn live_tabs(&self, window_id: WindowId) -> Result<Vec<LiveTab>, TabError> {
        let window = self.window(window_id)?;
        Ok(window
            .tab_order
            .iter()
            .enumerate()
            .map(|(index, id)| Self::live_tab(window, index, *id))
            .collect())
    }

    fn active_tab(&self, window_id: WindowId) -> Result<Option<LiveTab>, TabError> {
        let window = self.window(window_id)?;
        Ok(window.active_tab_id.and_then(|active| {
            window
                .tab_order
                .iter()
                .position(|id| *id == active)
                .map(|index| Self::live_tab(window, index, active))
        }))
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Simulates a browser restart: every tab gets a new id, window ids,
    /// strip order and active tabs survive. Returns `(old, new)` pairs.
    fn restart(&mut self) -> Vec<(TabId, TabId)> {
        let mut remapped = Vec::with_capacity(self.tabs.len());
        for w in 0..self.windows.len() {
            for pos in 0..self.windows[w].tab_order.len() {
                let old = self.windows[w].tab_order[pos];
                let new = self.allocate_tab_id();
                self.windows[w].tab_order[pos] = new;
                if self.windows[w].active_tab_id == Some(old) {
                    self.windows[w].active_tab_id = Some(new);
                }
                if let Some(tab) = self.tabs.iter_mut().find(|t| t.id == old) {
                    tab.id = new;
                }
                remapped.push((old, new));
            }
        }
        remapped
    }
}
