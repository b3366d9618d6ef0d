//! Navigation Engine: circular search and activation.

use std::collections::HashSet;
use std::sync::Arc;

use rstest::rstest;
use tab_favorites::database::Database;
use tab_favorites::managers::favorite_store::{FavoriteStore, FavoriteStoreTrait};
use tab_favorites::managers::tab_manager::{TabManager, TabManagerTrait};
use tab_favorites::services::navigation::{activate_nearest_favorite, find_nearest_favorite};
use tab_favorites::services::storage_local::SqliteStorage;
use tab_favorites::services::tab_host::SharedTabManager;
use tab_favorites::types::event::Direction;
use tab_favorites::types::tab::LiveTab;

/// Tabs with ids 1..=n in window 1.
fn strip(n: usize) -> Vec<LiveTab> {
    (0..n)
        .map(|i| LiveTab {
            id: i as i64 + 1,
            window_id: 1,
            index: i,
            active: false,
        })
        .collect()
}

fn search(n: usize, favorites: &[i64], from: i64, direction: Direction) -> Option<i64> {
    let favorites: HashSet<i64> = favorites.iter().copied().collect();
    let tabs = strip(n);
    find_nearest_favorite(&tabs, from, direction, |t| favorites.contains(&t.id)).map(|t| t.id)
}

// Tabs [A=1, B=2, C=3], only A favorite.
#[rstest]
#[case(2, Direction::Backward, Some(1))]
#[case(3, Direction::Forward, Some(1))]
#[case(2, Direction::Forward, Some(1))]
#[case(3, Direction::Backward, Some(1))]
#[case(1, Direction::Forward, Some(1))]
fn test_wraparound_to_single_favorite(
    #[case] from: i64,
    #[case] direction: Direction,
    #[case] expected: Option<i64>,
) {
    assert_eq!(search(3, &[1], from, direction), expected);
}

#[rstest]
#[case(Direction::Forward, Some(4))]
#[case(Direction::Backward, Some(2))]
fn test_nearest_in_each_direction(#[case] direction: Direction, #[case] expected: Option<i64>) {
    assert_eq!(search(5, &[2, 4], 3, direction), expected);
}

#[test]
fn test_start_is_skipped_on_first_step() {
    assert_eq!(search(3, &[2, 3], 2, Direction::Forward), Some(3));
}

#[test]
fn test_empty_window_has_no_result() {
    assert_eq!(search(0, &[1], 1, Direction::Forward), None);
}

#[test]
fn test_no_favorites_has_no_result() {
    assert_eq!(search(4, &[], 2, Direction::Backward), None);
}

#[test]
fn test_favorites_of_other_windows_do_not_count() {
    let tabs = strip(3);
    let found = find_nearest_favorite(&tabs, 1, Direction::Forward, |t| t.window_id == 2);
    assert!(found.is_none());
}

#[rstest]
#[case(Direction::Forward, Some(1))]
#[case(Direction::Backward, Some(3))]
fn test_unknown_start_enters_from_the_edge(
    #[case] direction: Direction,
    #[case] expected: Option<i64>,
) {
    assert_eq!(search(3, &[1, 3], 99, direction), expected);
}

#[test]
fn test_visits_each_tab_at_most_once() {
    let tabs = strip(6);
    let mut visited = Vec::new();
    let found = find_nearest_favorite(&tabs, 4, Direction::Forward, |t| {
        visited.push(t.id);
        false
    });
    assert!(found.is_none());
    assert_eq!(visited, vec![5, 6, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_activate_nearest_favorite_moves_active_pointer() {
    let storage = SqliteStorage::new(Arc::new(Database::open_in_memory().unwrap()));
    let host = SharedTabManager::new(TabManager::new());
    let (window, tabs) = {
        let mut mgr = host.lock().unwrap();
        let window = mgr.open_window();
        let tabs: Vec<i64> = (0..4)
            .map(|_| mgr.create_tab(window, None, false).unwrap())
            .collect();
        (window, tabs)
    };

    let mut store = FavoriteStore::new(Arc::new(storage.clone()));
    store.load().await.unwrap();
    store.add(tabs[3], window, 3);
    store.save().await.unwrap();

    let mut agent_store = FavoriteStore::new(Arc::new(storage));
    let found = activate_nearest_favorite(&mut agent_store, &host, window, tabs[0], Direction::Backward)
        .await
        .unwrap();
    assert_eq!(found, Some(tabs[3]));
    assert_eq!(
        host.lock().unwrap().active_tab(window).unwrap().unwrap().id,
        tabs[3]
    );
}

#[tokio::test]
async fn test_activate_without_favorites_keeps_active_tab() {
    let storage = SqliteStorage::new(Arc::new(Database::open_in_memory().unwrap()));
    let host = SharedTabManager::new(TabManager::new());
    let (window, first) = {
        let mut mgr = host.lock().unwrap();
        let window = mgr.open_window();
        let first = mgr.create_tab(window, None, true).unwrap();
        mgr.create_tab(window, None, false).unwrap();
        (window, first)
    };

    let mut store = FavoriteStore::new(Arc::new(storage));
    let found = activate_nearest_favorite(&mut store, &host, window, first, Direction::Forward)
        .await
        .unwrap();
    assert_eq!(found, None);
    assert_eq!(host.lock().unwrap().active_tab(window).unwrap().unwrap().id, first);
}
