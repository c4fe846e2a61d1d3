use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::EditorError;

pub const DEFAULT_CONFIG_NAME: &str = "trellis.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo levels (0 = unlimited)
    #[serde(default = "default_max_undo_levels")]
    pub max_undo_levels: usize,

    /// Prefix for ids assigned to copied nodes
    #[serde(default = "default_copy_id_prefix")]
    pub copy_id_prefix: String,
}

fn default_max_undo_levels() -> usize {
    100
}

fn default_copy_id_prefix() -> String {
    "copy".to_string()
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults if no
    /// config file exists
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config = Self::from_json(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded editor config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(source: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(source)?)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_undo_levels: default_max_undo_levels(),
            copy_id_prefix: default_copy_id_prefix(),
        }
    }
}
