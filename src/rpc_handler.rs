//! RPC method handler for the simulation harness.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches one request to the [`App`] simulation.

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::tab_manager::TabManagerTrait;
use crate::services::messaging::SentMessage;
use crate::services::registration::RegistrationState;
use crate::types::event::{Command, UnknownCommand};
use crate::types::tab::{TabId, WindowId};

fn int_param(params: &Value, name: &str) -> Result<i64, String> {
    params
        .get(name)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| format!("missing {}", name))
}

fn window_param(app: &App, params: &Value) -> Result<WindowId, String> {
    match params.get("window_id").and_then(|v| v.as_i64()) {
        Some(id) => Ok(id),
        None => app
            .tabs
            .lock()
            .map_err(|e| e.to_string())?
            .focused_window()
            .ok_or_else(|| "no focused window".to_string()),
    }
}

/// Encodes collaborator messages for a response.
pub fn encode_messages(sent: &[SentMessage]) -> Value {
    let arr: Vec<Value> = sent
        .iter()
        .map(|s| {
            let message = s.message.encode().unwrap_or(Value::Null);
            json!({"to": s.target, "message": message})
        })
        .collect();
    json!(arr)
}

/// Dispatch an RPC method call to the simulation.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &mut App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Windows ───
        "window.open" => {
            let window_id = app.open_window().await.map_err(|e| e.to_string())?;
            let registered = app
                .agent(window_id)
                .map(|a| a.registration_state() == RegistrationState::Registered)
                .unwrap_or(false);
            Ok(json!({"window_id": window_id, "registered": registered}))
        }
        "window.close" => {
            let window_id = int_param(params, "window_id")?;
            app.close_window(window_id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "window.focus" => {
            let window_id = int_param(params, "window_id")?;
            app.focus_window(window_id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Tabs ───
        "tab.create" => {
            let window_id = window_param(app, params)?;
            let url = params.get("url").and_then(|v| v.as_str());
            let active = params.get("active").and_then(|v| v.as_bool()).unwrap_or(false);
            let tab_id = app
                .create_tab(window_id, url, active)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"tab_id": tab_id, "window_id": window_id}))
        }
        "tab.list" => {
            let window_id = window_param(app, params)?;
            let tabs = app
                .tabs
                .lock()
                .map_err(|e| e.to_string())?
                .live_tabs(window_id)
                .map_err(|e| e.to_string())?;
            serde_json::to_value(tabs).map_err(|e| e.to_string())
        }
        "tab.activate" => {
            let tab_id: TabId = int_param(params, "tab_id")?;
            app.activate_tab(tab_id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tab.move" => {
            let tab_id: TabId = int_param(params, "tab_id")?;
            let index = int_param(params, "index")?;
            let index = usize::try_from(index).map_err(|_| format!("invalid index: {}", index))?;
            let info = app.move_tab(tab_id, index).await.map_err(|e| e.to_string())?;
            serde_json::to_value(info).map_err(|e| e.to_string())
        }
        "tab.close" => {
            let tab_id: TabId = int_param(params, "tab_id")?;
            let info = app.close_tab(tab_id).await.map_err(|e| e.to_string())?;
            serde_json::to_value(info).map_err(|e| e.to_string())
        }

        // ─── Browser ───
        "browser.restart" => {
            let remapped = app.restart().await.map_err(|e| e.to_string())?;
            let arr: Vec<Value> = remapped
                .iter()
                .map(|(old, new)| json!({"old": old, "new": new}))
                .collect();
            Ok(json!({"remapped": arr}))
        }
        "command" => {
            let name = params.get("name").and_then(|v| v.as_str()).ok_or("missing name")?;
            let command: Command = name.parse().map_err(|e: UnknownCommand| e.to_string())?;
            app.run_command(command).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Collaborator ───
        "collaborator.set_available" => {
            let available = params
                .get("available")
                .and_then(|v| v.as_bool())
                .ok_or("missing available")?;
            app.collaborator.set_available(available);
            Ok(json!({"ok": true}))
        }
        "collaborator.set_rejecting" => {
            let rejecting = params
                .get("rejecting")
                .and_then(|v| v.as_bool())
                .ok_or("missing rejecting")?;
            app.collaborator.set_rejecting(rejecting);
            Ok(json!({"ok": true}))
        }
        "collaborator.ready" => {
            app.collaborator_ready().await;
            Ok(json!({"ok": true}))
        }
        "external.message" => {
            let sender = params.get("sender").and_then(|v| v.as_str()).ok_or("missing sender")?;
            let payload = params.get("payload").cloned().ok_or("missing payload")?;
            app.deliver_external(sender, payload).await;
            Ok(json!({"ok": true}))
        }

        // ─── Favorites ───
        "favorites.list" => {
            let window_id = window_param(app, params)?;
            let agent = app
                .agent_mut(window_id)
                .ok_or_else(|| format!("no agent for window {}", window_id))?;
            let favorites = agent.favorites_in_window().await.map_err(|e| e.to_string())?;
            serde_json::to_value(favorites).map_err(|e| e.to_string())
        }
        "favorites.clear" => {
            let window_id = window_param(app, params)?;
            let agent = app
                .agent_mut(window_id)
                .ok_or_else(|| format!("no agent for window {}", window_id))?;
            let cleared = agent.clear_favorites().await.map_err(|e| e.to_string())?;
            Ok(json!({"cleared": cleared}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
