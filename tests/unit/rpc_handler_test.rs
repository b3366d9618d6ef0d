//! Unit tests for the RPC handler: every method dispatched by `handle_method`.
//!
//! These go through the same code path as the `tab-favorites-rpc` binary,
//! using a temporary on-disk SQLite database.

use serde_json::{json, Value};
use tempfile::TempDir;

use tab_favorites::app::App;
use tab_favorites::rpc_handler::{encode_messages, handle_method};
use tab_favorites::types::settings::AgentConfig;

/// Create a fresh App backed by a temp directory DB.
fn setup() -> (App, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let db_path = tmp.path().join("test.db");
    let config = AgentConfig {
        flash_delay_ms: 0,
        ..AgentConfig::default()
    };
    let app = App::new(db_path.to_str().unwrap(), config).expect("Failed to init App");
    (app, tmp)
}

async fn call(app: &mut App, method: &str, params: Value) -> Value {
    handle_method(app, method, &params)
        .await
        .unwrap_or_else(|e| panic!("{} failed: {}", method, e))
}

// ─── Ping ───

#[tokio::test]
async fn test_ping() {
    let (mut app, _tmp) = setup();
    assert_eq!(call(&mut app, "ping", json!({})).await, json!({"pong": true}));
}

// ─── Unknown method ───

#[tokio::test]
async fn test_unknown_method_returns_error() {
    let (mut app, _tmp) = setup();
    let res = handle_method(&mut app, "nonexistent.method", &json!({})).await;
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Windows and tabs ───

#[tokio::test]
async fn test_window_open_registers_agent() {
    let (mut app, _tmp) = setup();
    let res = call(&mut app, "window.open", json!({})).await;
    assert_eq!(res["registered"], json!(true));

    let window_id = res["window_id"].as_i64().unwrap();
    let tabs = call(&mut app, "tab.list", json!({"window_id": window_id})).await;
    assert_eq!(tabs.as_array().unwrap().len(), 1);
    assert_eq!(tabs[0]["active"], json!(true));
}

#[tokio::test]
async fn test_window_open_without_collaborator() {
    let (mut app, _tmp) = setup();
    call(&mut app, "collaborator.set_available", json!({"available": false})).await;
    let res = call(&mut app, "window.open", json!({})).await;
    assert_eq!(res["registered"], json!(false));
}

#[tokio::test]
async fn test_tab_create_defaults_to_focused_window() {
    let (mut app, _tmp) = setup();
    let window = call(&mut app, "window.open", json!({})).await["window_id"].clone();
    let res = call(&mut app, "tab.create", json!({"url": "https://rust-lang.org"})).await;
    assert_eq!(res["window_id"], window);

    let tabs = call(&mut app, "tab.list", json!({})).await;
    assert_eq!(tabs.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_tab_move_and_close() {
    let (mut app, _tmp) = setup();
    call(&mut app, "window.open", json!({})).await;
    let tab = call(&mut app, "tab.create", json!({})).await["tab_id"].clone();

    let moved = call(&mut app, "tab.move", json!({"tab_id": tab, "index": 0})).await;
    assert_eq!(moved["fromIndex"], json!(1));
    assert_eq!(moved["toIndex"], json!(0));

    let closed = call(&mut app, "tab.close", json!({"tab_id": tab})).await;
    assert_eq!(closed["isWindowClosing"], json!(false));
}

#[tokio::test]
async fn test_tab_errors_are_reported() {
    let (mut app, _tmp) = setup();
    call(&mut app, "window.open", json!({})).await;
    assert!(handle_method(&mut app, "tab.activate", &json!({"tab_id": 999})).await.is_err());
    assert!(handle_method(&mut app, "tab.move", &json!({"tab_id": 1, "index": -1})).await.is_err());
    assert!(handle_method(&mut app, "tab.close", &json!({})).await.is_err());
}

#[tokio::test]
async fn test_window_close_and_focus() {
    let (mut app, _tmp) = setup();
    let first = call(&mut app, "window.open", json!({})).await["window_id"].clone();
    let second = call(&mut app, "window.open", json!({})).await["window_id"].clone();

    call(&mut app, "window.focus", json!({"window_id": first})).await;
    call(&mut app, "window.close", json!({"window_id": second})).await;
    assert!(handle_method(&mut app, "tab.list", &json!({"window_id": second})).await.is_err());
}

// ─── Commands and favorites ───

#[tokio::test]
async fn test_toggle_command_and_list() {
    let (mut app, _tmp) = setup();
    call(&mut app, "window.open", json!({})).await;
    let tab = call(&mut app, "tab.create", json!({"active": true})).await["tab_id"].clone();

    call(&mut app, "command", json!({"name": "toggle-favorite"})).await;

    let favorites = call(&mut app, "favorites.list", json!({})).await;
    assert_eq!(favorites.as_array().unwrap().len(), 1);
    assert_eq!(favorites[0]["id"], tab);
    assert_eq!(favorites[0]["index"], json!(1));
}

#[tokio::test]
async fn test_unknown_command_is_rejected() {
    let (mut app, _tmp) = setup();
    call(&mut app, "window.open", json!({})).await;
    let err = handle_method(&mut app, "command", &json!({"name": "reload"}))
        .await
        .unwrap_err();
    assert!(err.contains("reload"));
}

#[tokio::test]
async fn test_favorites_clear() {
    let (mut app, _tmp) = setup();
    call(&mut app, "window.open", json!({})).await;
    call(&mut app, "command", json!({"name": "toggle-favorite"})).await;

    let res = call(&mut app, "favorites.clear", json!({})).await;
    assert_eq!(res["cleared"].as_array().unwrap().len(), 1);
    let favorites = call(&mut app, "favorites.list", json!({})).await;
    assert_eq!(favorites, json!([]));
}

#[tokio::test]
async fn test_browser_restart_reports_remapped_ids() {
    let (mut app, _tmp) = setup();
    call(&mut app, "window.open", json!({})).await;
    call(&mut app, "command", json!({"name": "toggle-favorite"})).await;

    let res = call(&mut app, "browser.restart", json!({})).await;
    let remapped = res["remapped"].as_array().unwrap();
    assert_eq!(remapped.len(), 1);

    let favorites = call(&mut app, "favorites.list", json!({})).await;
    assert_eq!(favorites[0]["id"], remapped[0]["new"]);
}

// ─── Collaborator ───

#[tokio::test]
async fn test_collaborator_ready_registers_deferred_agent() {
    let (mut app, _tmp) = setup();
    call(&mut app, "collaborator.set_available", json!({"available": false})).await;
    call(&mut app, "window.open", json!({})).await;

    call(&mut app, "collaborator.ready", json!({})).await;

    let messages = encode_messages(&app.collaborator.take_sent());
    assert_eq!(messages[0]["to"], json!(app.config.collaborator_id));
    assert_eq!(messages[0]["message"]["type"], json!("register-self"));
}

#[tokio::test]
async fn test_external_message_requires_params() {
    let (mut app, _tmp) = setup();
    assert!(handle_method(&mut app, "external.message", &json!({"sender": "x"})).await.is_err());
    call(
        &mut app,
        "external.message",
        json!({"sender": "x", "payload": {"type": "ready"}}),
    )
    .await;
}

#[tokio::test]
async fn test_window_open_with_rejecting_collaborator() {
    let (mut app, _tmp) = setup();
    call(&mut app, "collaborator.set_rejecting", json!({"rejecting": true})).await;
    let res = call(&mut app, "window.open", json!({})).await;
    assert_eq!(res["registered"], json!(false));
    assert!(handle_method(&mut app, "collaborator.set_rejecting", &json!({})).await.is_err());
}
