//! User settings for SaveVault
//!
//! Settings are plain JSON next to the save directory. They only affect how
//! slot files are named and which slot is loaded after a delete.

use serde::{Deserialize, Serialize};

use super::paths::SavePaths;
use crate::error::SaveError;

/// User settings for SaveVault
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Product name used as the slot file prefix
    #[serde(default = "default_product_name")]
    pub product_name: String,

    /// Slot to load after the active one is deleted
    #[serde(default)]
    pub fallback_slot: u32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_product_name() -> String {
    "SaveVault".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            product_name: default_product_name(),
            fallback_slot: 0,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &SavePaths) -> Result<Self, SaveError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| SaveError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                SaveError::Json(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Reject settings that would produce unusable slot paths
    pub fn validate(&self) -> Result<(), SaveError> {
        if self.product_name.trim().is_empty() {
            return Err(SaveError::Config("product_name must not be empty".into()));
        }
        if self
            .product_name
            .chars()
            .any(|c| std::path::is_separator(c) || c == '\0')
        {
            return Err(SaveError::Config(format!(
                "product_name '{}' must not contain path separators",
                self.product_name
            )));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SavePaths) -> Result<(), SaveError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| SaveError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
