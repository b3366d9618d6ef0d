// Settings Engine
// Loads the agent configuration file and the favorite style stored alongside
// the favorites. The config file is JSON at the platform-specific config path.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::warn;

use crate::platform;
use crate::services::storage_local::KeyValueStore;
use crate::types::errors::ConfigError;
use crate::types::settings::{AgentConfig, FavoriteSettings, FAVORITE_TAB_CSS_KEY};

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<AgentConfig, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn get_config(&self) -> &AgentConfig;
    fn reset(&mut self) -> Result<(), ConfigError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists the agent config as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    config: AgentConfig,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `config.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("config.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            config: AgentConfig::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads the config file.
    ///
    /// If the file does not exist, returns the default config.
    /// If the file exists but is malformed, returns a serialization error.
    /// Missing fields take their default values.
    fn load(&mut self) -> Result<AgentConfig, ConfigError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.config = AgentConfig::default();
            return Ok(self.config.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;

        let config: AgentConfig = serde_json::from_str(&content).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;

        self.config = config;
        Ok(self.config.clone())
    }

    /// Saves the current config, creating parent directories if needed.
    fn save(&self) -> Result<(), ConfigError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_config(&self) -> &AgentConfig {
        &self.config
    }

    /// Resets the config to defaults and saves to disk.
    fn reset(&mut self) -> Result<(), ConfigError> {
        self.config = AgentConfig::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}

/// Reads the favorite style from the shared store.
///
/// Never fails: an absent, empty, non-string or unreadable value yields the
/// default style.
pub async fn load_favorite_settings(storage: &dyn KeyValueStore) -> FavoriteSettings {
    match storage.get(FAVORITE_TAB_CSS_KEY).await {
        Ok(Some(Value::String(css))) if !css.is_empty() => FavoriteSettings {
            favorite_tab_css: css,
        },
        Ok(Some(other)) if !matches!(other, Value::String(_)) => {
            warn!(value = %other, "favorite style is not a string, using default");
            FavoriteSettings::default()
        }
        Ok(_) => FavoriteSettings::default(),
        Err(e) => {
            warn!(error = %e, "failed to read favorite style, using default");
            FavoriteSettings::default()
        }
    }
}
