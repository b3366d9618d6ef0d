//! Tab favorites simulation server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"tab.create", "params":{"window_id":1,"active":true}}
//! Response: {"id":1, "result":{...}, "messages":[...]} or {"id":1, "error":"...", "messages":[...]}
//!
//! `messages` lists what the collaborator received while the request was handled.
//! Logs go to stderr; set `RUST_LOG` to change the level.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use serde_json::{json, Value};

use tab_favorites::app::App;
use tab_favorites::platform;
use tab_favorites::rpc_handler::{encode_messages, handle_method};
use tab_favorites::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

fn emit(out: &mut impl Write, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let data_dir = match std::env::var("TAB_FAVORITES_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => platform::get_data_dir(),
    };
    std::fs::create_dir_all(&data_dir)?;
    let db_path = data_dir.join("tab-favorites.db");

    let mut settings = SettingsEngine::new(None);
    let config = settings.load()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let mut app = App::new(&db_path.to_string_lossy(), config)?;

    let mut stdout = io::stdout();
    emit(&mut stdout, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}))?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&mut stdout, &json!({"id": null, "error": format!("parse error: {}", e)}))?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let result = runtime.block_on(handle_method(&mut app, method, &params));
        let messages = encode_messages(&app.collaborator.take_sent());

        let response = match result {
            Ok(val) => json!({"id": id, "result": val, "messages": messages}),
            Err(err) => json!({"id": id, "error": err, "messages": messages}),
        };
        emit(&mut stdout, &response)?;
    }
    Ok(())
}
