use serde::{Deserialize, Serialize};

/// Storage key of the user style applied to favorite tabs.
pub const FAVORITE_TAB_CSS_KEY: &str = "favoriteTabCSS";

/// Declarations used when no style has been stored.
pub const DEFAULT_FAVORITE_TAB_CSS: &str =
    "background-color: orange !important; text-shadow: 2px 2px 4px purple !important;";

/// Identity of the tree-style tab sidebar that renders the highlight.
pub const DEFAULT_COLLABORATOR_ID: &str = "treestyletab@piro.sakura.ne.jp";

pub const DEFAULT_EXTENSION_ID: &str = "tab-favorites@tab-favorites.org";

pub const DEFAULT_FLASH_DELAY_MS: u64 = 200;

/// User-facing favorite style, read from the shared store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteSettings {
    pub favorite_tab_css: String,
}

impl Default for FavoriteSettings {
    fn default() -> Self {
        Self {
            favorite_tab_css: DEFAULT_FAVORITE_TAB_CSS.to_string(),
        }
    }
}

impl FavoriteSettings {
    /// Full style rule sent with the registration request.
    pub fn registration_style(&self) -> String {
        format!(
            ".tab.favorite-tab tab-item-substance {{ {} }}",
            self.favorite_tab_css
        )
    }
}

/// Per-installation agent configuration, stored as JSON on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentConfig {
    /// Identity this extension registers under.
    pub extension_id: String,
    /// Extension that receives registration and tab-state messages.
    pub collaborator_id: String,
    /// Pause between the remove and add halves of a flash.
    pub flash_delay_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            extension_id: DEFAULT_EXTENSION_ID.to_string(),
            collaborator_id: DEFAULT_COLLABORATOR_ID.to_string(),
            flash_delay_ms: DEFAULT_FLASH_DELAY_MS,
        }
    }
}
