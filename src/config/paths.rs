//! Path management for SaveVault
//!
//! ## Path Resolution Order
//!
//! 1. `SAVEVAULT_DATA_DIR` environment variable (if set)
//! 2. The platform data directory from `directories`
//!    (`~/.local/share/savevault`, `~/Library/Application Support/savevault`,
//!    `%APPDATA%\savevault\data`)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::SaveError;

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "SAVEVAULT_DATA_DIR";

/// Manages all paths used by SaveVault
#[derive(Debug, Clone)]
pub struct SavePaths {
    /// Base directory for all SaveVault data
    base_dir: PathBuf,
}

impl SavePaths {
    /// Create a new SavePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, SaveError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create SavePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the directory holding slot files
    pub fn saves_dir(&self) -> PathBuf {
        self.base_dir.join("Saves")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the unencrypted preferences file
    pub fn preferences_file(&self) -> PathBuf {
        self.base_dir.join("prefs.json")
    }

    /// Get the path to the generated installation id
    pub fn installation_id_file(&self) -> PathBuf {
        self.base_dir.join("installation_id")
    }

    /// Get the path of a slot file
    ///
    /// `{product}_SaveFile_{index}.bin`, with spaces in the product name
    /// replaced by underscores.
    pub fn slot_file(&self, product_name: &str, index: u32) -> PathBuf {
        self.saves_dir().join(slot_file_name(product_name, index))
    }

    /// Ensure the base and saves directories exist
    pub fn ensure_directories(&self) -> Result<(), SaveError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SaveError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.saves_dir())
            .map_err(|e| SaveError::Io(format!("Failed to create saves directory: {}", e)))?;

        Ok(())
    }
}

/// File name of a slot, without directory
pub fn slot_file_name(product_name: &str, index: u32) -> String {
    format!("{}_SaveFile_{}.bin", product_name.replace(' ', "_"), index)
}

/// Parse a slot index back out of a file name produced by [`slot_file_name`]
pub fn parse_slot_file_name(product_name: &str, file_name: &str) -> Option<u32> {
    let prefix = format!("{}_SaveFile_", product_name.replace(' ', "_"));
    file_name
        .strip_prefix(&prefix)?
        .strip_suffix(".bin")?
        .parse()
        .ok()
}

/// Resolve the default data directory path based on platform
fn resolve_default_path() -> Result<PathBuf, SaveError> {
    ProjectDirs::from("", "", "savevault")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SaveError::Config("Could not determine a home directory".into()))
}
