//! Property-based tests for favorite toggling.
//!
//! Toggling a tab twice must leave the persisted collection exactly as it
//! was, whatever else is stored, and the collection must never hold two
//! records for the same `(tab, window)` pair.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use tab_favorites::agent::{ToggleOutcome, WindowAgent};
use tab_favorites::database::Database;
use tab_favorites::managers::tab_manager::TabManager;
use tab_favorites::services::messaging::RecordingMessenger;
use tab_favorites::services::storage_local::{KeyValueStore, SqliteStorage};
use tab_favorites::services::tab_host::SharedTabManager;
use tab_favorites::types::favorite::{FavoriteRecord, FAVORITE_TABS_KEY};
use tab_favorites::types::settings::AgentConfig;
use tab_favorites::types::tab::LiveTab;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime")
}

fn agent(storage: &SqliteStorage, window_id: i64) -> WindowAgent {
    WindowAgent::new(
        window_id,
        &AgentConfig {
            flash_delay_ms: 0,
            ..AgentConfig::default()
        },
        Arc::new(storage.clone()),
        Arc::new(SharedTabManager::new(TabManager::new())),
        Arc::new(RecordingMessenger::available()),
    )
}

/// Records with distinct `(tab, window)` pairs.
fn arb_records() -> impl Strategy<Value = Vec<FavoriteRecord>> {
    prop::collection::vec((1..30i64, 1..4i64, 0..10usize), 0..12).prop_map(|raw| {
        let mut seen = HashSet::new();
        raw.into_iter()
            .filter(|(tab, window, _)| seen.insert((*tab, *window)))
            .map(|(tab, window, index)| FavoriteRecord::new(tab, window, index))
            .collect()
    })
}

fn arb_tab() -> impl Strategy<Value = LiveTab> {
    (1..30i64, 1..4i64, 0..10usize).prop_map(|(id, window_id, index)| LiveTab {
        id,
        window_id,
        index,
        active: true,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn toggle_twice_restores_collection(records in arb_records(), tab in arb_tab()) {
        runtime().block_on(async {
            let storage = SqliteStorage::new(Arc::new(Database::open_in_memory().unwrap()));
            let before = serde_json::to_value(&records).unwrap();
            storage.set(FAVORITE_TABS_KEY, before.clone()).await.unwrap();

            let mut agent = agent(&storage, tab.window_id);
            let was_favorite = records.iter().any(|r| r.tab_id == tab.id && r.window_id == tab.window_id);

            let first = agent.toggle_favorite(&tab).await.unwrap();
            let expected = if was_favorite { ToggleOutcome::Removed } else { ToggleOutcome::Added };
            prop_assert_eq!(first, expected);

            agent.toggle_favorite(&tab).await.unwrap();
            let after = storage.get(FAVORITE_TABS_KEY).await.unwrap().unwrap();

            let mut before_set: Vec<FavoriteRecord> = serde_json::from_value(before).unwrap();
            let mut after_set: Vec<FavoriteRecord> = serde_json::from_value(after).unwrap();
            let key = |r: &FavoriteRecord| (r.tab_id, r.window_id, r.index);
            before_set.sort_by_key(key);
            after_set.sort_by_key(key);
            if was_favorite {
                // Re-adding takes the tab's current index.
                for r in before_set.iter_mut().filter(|r| r.tab_id == tab.id && r.window_id == tab.window_id) {
                    r.index = tab.index;
                }
                before_set.sort_by_key(key);
            }
            prop_assert_eq!(before_set, after_set);
            Ok(())
        })?;
    }

    #[test]
    fn toggling_never_duplicates_pairs(tabs in prop::collection::vec(arb_tab(), 1..20)) {
        runtime().block_on(async {
            let storage = SqliteStorage::new(Arc::new(Database::open_in_memory().unwrap()));
            for tab in &tabs {
                agent(&storage, tab.window_id).toggle_favorite(tab).await.unwrap();
            }

            let stored = storage.get(FAVORITE_TABS_KEY).await.unwrap().unwrap();
            let records: Vec<FavoriteRecord> = serde_json::from_value(stored).unwrap();
            let pairs: HashSet<(i64, i64)> = records.iter().map(|r| (r.tab_id, r.window_id)).collect();
            prop_assert_eq!(pairs.len(), records.len());
            Ok(())
        })?;
    }
}
