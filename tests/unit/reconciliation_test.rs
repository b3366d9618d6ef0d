//! Reconciliation passes against a live in-memory host and a shared store.

use std::sync::Arc;

use serde_json::json;
use tab_favorites::database::Database;
use tab_favorites::managers::favorite_store::{FavoriteStore, FavoriteStoreTrait};
use tab_favorites::managers::tab_manager::{TabManager, TabManagerTrait};
use tab_favorites::services::reconciliation::{remap_tab_ids, remap_tab_indexes};
use tab_favorites::services::storage_local::{KeyValueStore, SqliteStorage};
use tab_favorites::services::tab_host::SharedTabManager;
use tab_favorites::types::favorite::{FavoriteRecord, FAVORITE_TABS_KEY};

struct Fixture {
    db: Arc<Database>,
    storage: SqliteStorage,
    host: SharedTabManager,
    window: i64,
    tabs: Vec<i64>,
}

fn setup(tab_count: usize) -> Fixture {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let storage = SqliteStorage::new(db.clone());
    let host = SharedTabManager::new(TabManager::new());
    let (window, tabs) = {
        let mut mgr = host.lock().unwrap();
        let window = mgr.open_window();
        let tabs = (0..tab_count)
            .map(|_| mgr.create_tab(window, None, false).unwrap())
            .collect();
        (window, tabs)
    };
    Fixture {
        db,
        storage,
        host,
        window,
        tabs,
    }
}

async fn persisted(storage: &SqliteStorage) -> Vec<FavoriteRecord> {
    let mut store = FavoriteStore::new(Arc::new(storage.clone()));
    store.load().await.unwrap();
    store.collection().records.clone()
}

async fn seed(storage: &SqliteStorage, records: &[FavoriteRecord]) {
    storage
        .set(FAVORITE_TABS_KEY, serde_json::to_value(records).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_id_remap_after_restart() {
    let fx = setup(3);
    seed(
        &fx.storage,
        &[
            FavoriteRecord::new(fx.tabs[1], fx.window, 1),
            FavoriteRecord::new(fx.tabs[2], fx.window, 2),
        ],
    )
    .await;

    let remapped = fx.host.lock().unwrap().restart();
    let new_ids: Vec<i64> = remapped.iter().map(|(_, new)| *new).collect();

    let mut store = FavoriteStore::new(Arc::new(fx.storage.clone()));
    let changed = remap_tab_ids(&mut store, &fx.host, fx.window).await.unwrap();
    assert_eq!(changed, 2);

    assert_eq!(
        persisted(&fx.storage).await,
        vec![
            FavoriteRecord::new(new_ids[1], fx.window, 1),
            FavoriteRecord::new(new_ids[2], fx.window, 2),
        ]
    );
}

#[tokio::test]
async fn test_id_remap_leaves_other_window_records_untouched() {
    let fx = setup(2);
    let foreign = FavoriteRecord::new(77, fx.window + 100, 0);
    let own = FavoriteRecord::new(1000, fx.window, 0);
    seed(&fx.storage, &[foreign.clone(), own]).await;

    let mut store = FavoriteStore::new(Arc::new(fx.storage.clone()));
    remap_tab_ids(&mut store, &fx.host, fx.window).await.unwrap();

    let records = persisted(&fx.storage).await;
    assert_eq!(records[0], foreign);
    assert_eq!(records[1], FavoriteRecord::new(fx.tabs[0], fx.window, 0));
}

#[tokio::test]
async fn test_id_remap_without_collection_saves_nothing() {
    let fx = setup(2);
    let mut store = FavoriteStore::new(Arc::new(fx.storage.clone()));

    let changed = remap_tab_ids(&mut store, &fx.host, fx.window).await.unwrap();
    assert_eq!(changed, 0);
    assert_eq!(fx.storage.get(FAVORITE_TABS_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_id_remap_in_sync_collection_is_not_rewritten() {
    let fx = setup(2);
    fx.storage
        .set_raw(FAVORITE_TABS_KEY, &format!(
            r#"[ {{"id": {}, "index": 0, "windowId": {}}} ]"#,
            fx.tabs[0], fx.window
        ))
        .unwrap();

    let mut store = FavoriteStore::new(Arc::new(fx.storage.clone()));
    let changed = remap_tab_ids(&mut store, &fx.host, fx.window).await.unwrap();
    assert_eq!(changed, 0);

    // The original text survives because no save happened.
    let raw: String = fx
        .db
        .connection()
        .query_row(
            "SELECT value FROM storage_local WHERE key = ?1",
            [FAVORITE_TABS_KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert!(raw.starts_with("[ {"), "collection was rewritten: {}", raw);
}

#[tokio::test]
async fn test_index_remap_follows_moved_favorite() {
    let fx = setup(3);
    seed(&fx.storage, &[FavoriteRecord::new(fx.tabs[0], fx.window, 0)]).await;

    fx.host.lock().unwrap().move_tab(fx.tabs[0], 2).unwrap();

    let mut store = FavoriteStore::new(Arc::new(fx.storage.clone()));
    let matched = remap_tab_indexes(&mut store, &fx.host, fx.window).await.unwrap();
    assert_eq!(matched, 1);
    assert_eq!(
        persisted(&fx.storage).await,
        vec![FavoriteRecord::new(fx.tabs[0], fx.window, 2)]
    );
}

#[tokio::test]
async fn test_index_remap_always_saves() {
    let fx = setup(1);
    let mut store = FavoriteStore::new(Arc::new(fx.storage.clone()));

    remap_tab_indexes(&mut store, &fx.host, fx.window).await.unwrap();
    assert_eq!(fx.storage.get(FAVORITE_TABS_KEY).await.unwrap(), Some(json!([])));
}

#[tokio::test]
async fn test_remap_for_missing_window_is_error_and_saves_nothing() {
    let fx = setup(1);
    let mut store = FavoriteStore::new(Arc::new(fx.storage.clone()));

    assert!(remap_tab_indexes(&mut store, &fx.host, 999).await.is_err());
    assert_eq!(fx.storage.get(FAVORITE_TABS_KEY).await.unwrap(), None);
}
