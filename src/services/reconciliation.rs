//! Reconciliation Engine.
//!
//! Host tab ids are reassigned on restart while strip order usually survives,
//! and strip positions shift whenever a tab is moved. Two passes keep stored
//! favorites anchored to the right live tab:
//!
//! - the **id remap** trusts the stored `index` and rewrites `tab_id`;
//! - the **index remap** trusts the stored `tab_id` and rewrites `index`.
//!
//! Records belonging to another window are never touched by a pass. They get
//! repaired when that window's own agent runs the pass.

use tracing::debug;

use crate::managers::favorite_store::{FavoriteStore, FavoriteStoreTrait};
use crate::services::tab_host::TabHost;
use crate::types::errors::AgentError;
use crate::types::favorite::FavoriteRecord;
use crate::types::tab::{LiveTab, WindowId};

/// Rewrites `tab_id` of every record whose stored position is occupied by a
/// tab of the same window with a different id. Returns how many changed.
///
/// A rewrite that would give two records the same `(tab, window)` pair is
/// skipped; the first record claiming a live tab keeps it.
///
/// `live_tabs` must be one window's tabs in strip order.
pub fn apply_id_remap(records: &mut [FavoriteRecord], live_tabs: &[LiveTab]) -> usize {
    let mut changed = 0;
    for i in 0..records.len() {
        let record = &records[i];
        let Some(live) = live_tabs.get(record.index) else {
            continue;
        };
        if live.window_id != record.window_id || live.id == record.tab_id {
            continue;
        }
        if records.iter().any(|r| r.matches(live.id, live.window_id)) {
            debug!(
                window_id = record.window_id,
                index = record.index,
                stale = record.tab_id,
                taken = live.id,
                "live tab already has a favorite, leaving stale record"
            );
            continue;
        }
        debug!(
            window_id = record.window_id,
            index = record.index,
            from = record.tab_id,
            to = live.id,
            "remapping favorite tab id"
        );
        records[i].tab_id = live.id;
        changed += 1;
    }
    changed
}

/// Rewrites `index` of every record whose tab is found in `live_tabs`.
/// Returns how many records matched a live tab.
pub fn apply_index_remap(records: &mut [FavoriteRecord], live_tabs: &[LiveTab]) -> usize {
    let mut matched = 0;
    for record in records.iter_mut() {
        if let Some(live) = live_tabs
            .iter()
            .find(|t| t.id == record.tab_id && t.window_id == record.window_id)
        {
            record.index = live.index;
            matched += 1;
        }
    }
    matched
}

/// Startup pass: repairs ids after a restart. Saves once, and only if
/// something changed.
pub async fn remap_tab_ids(
    store: &mut FavoriteStore,
    host: &dyn TabHost,
    window_id: WindowId,
) -> Result<usize, AgentError> {
    let live_tabs = host.query_tabs(window_id).await?;

    store.load().await?;
    let changed = apply_id_remap(store.records_mut(), &live_tabs);
    if changed > 0 {
        store.save().await?;
    }

    debug!(window_id, changed, "tab id remap finished");
    Ok(changed)
}

/// Move pass: re-derives indexes from live positions and always saves.
pub async fn remap_tab_indexes(
    store: &mut FavoriteStore,
    host: &dyn TabHost,
    window_id: WindowId,
) -> Result<usize, AgentError> {
    let live_tabs = host.query_tabs(window_id).await?;

    store.load().await?;
    let matched = apply_index_remap(store.records_mut(), &live_tabs);
    store.save().await?;

    debug!(window_id, matched, "tab index remap finished");
    Ok(matched)
}
