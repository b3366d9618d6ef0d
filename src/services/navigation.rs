//! Navigation Engine: jump to the nearest favorite in either direction.

use tracing::debug;

use crate::managers::favorite_store::{FavoriteStore, FavoriteStoreTrait};
use crate::services::tab_host::TabHost;
use crate::types::errors::AgentError;
use crate::types::event::Direction;
use crate::types::tab::{LiveTab, TabId, WindowId};

/// Position reached by one step from `pos` in a strip of `len > 0` tabs.
///
/// `None` stands for a start tab missing from the strip: stepping forward
/// from it lands on the first tab, stepping backward on the last.
fn step(pos: Option<usize>, len: usize, direction: Direction) -> usize {
    match (pos, direction) {
        (None, Direction::Forward) => 0,
        (None, Direction::Backward) => len - 1,
        (Some(i), Direction::Forward) => (i + 1) % len,
        (Some(i), Direction::Backward) => (i + len - 1) % len,
    }
}

/// Walks `tabs` circularly from `current` and returns the first tab for
/// which `is_favorite` holds.
///
/// The start tab is not tested on the first step. At most `tabs.len()` tabs
/// are visited, so the last candidate of a full circuit is the start tab
/// itself.
pub fn find_nearest_favorite<'a, F>(
    tabs: &'a [LiveTab],
    current: TabId,
    direction: Direction,
    mut is_favorite: F,
) -> Option<&'a LiveTab>
where
    F: FnMut(&LiveTab) -> bool,
{
    let len = tabs.len();
    if len == 0 {
        return None;
    }

    let mut pos = tabs.iter().position(|t| t.id == current);
    for _ in 0..len {
        let next = step(pos, len, direction);
        let candidate = &tabs[next];
        if is_favorite(candidate) {
            return Some(candidate);
        }
        pos = Some(next);
    }
    None
}

/// Finds the nearest favorite from `current` within `window_id` and
/// activates it. Returns the activated tab, or `None` if the window has no
/// favorite.
pub async fn activate_nearest_favorite(
    store: &mut FavoriteStore,
    host: &dyn TabHost,
    window_id: WindowId,
    current: TabId,
    direction: Direction,
) -> Result<Option<TabId>, AgentError> {
    let tabs = host.query_tabs(window_id).await?;
    store.load().await?;

    let found = find_nearest_favorite(&tabs, current, direction, |t| {
        store.is_favorite(t.id, t.window_id)
    })
    .map(|t| t.id);

    match found {
        Some(tab_id) => {
            debug!(window_id, from = current, to = tab_id, ?direction, "activating favorite");
            host.activate_tab(tab_id).await?;
        }
        None => debug!(window_id, from = current, ?direction, "no favorite to activate"),
    }
    Ok(found)
}
