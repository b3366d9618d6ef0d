// Platform paths for Linux
// Config: ~/.config/tab-favorites
// Data:   ~/.local/share/tab-favorites

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "tab-favorites";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$XDG_CONFIG_HOME/tab-favorites` if set, otherwise `~/.config/tab-favorites`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg).join(APP_DIR),
        Err(_) => home_dir().join(".config").join(APP_DIR),
    }
}

/// Uses `$XDG_DATA_HOME/tab-favorites` if set, otherwise `~/.local/share/tab-favorites`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) => PathBuf::from(xdg).join(APP_DIR),
        Err(_) => home_dir().join(".local").join("share").join(APP_DIR),
    }
}
