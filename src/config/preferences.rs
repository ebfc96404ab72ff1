//! Unencrypted integer preferences
//!
//! A small name → integer map kept outside the encrypted slots. It holds the
//! selected slot index, which has to be known before any slot is opened.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::SaveError;
use crate::storage::file_io::{read_json, write_json_atomic};

/// Preference key holding the selected slot index
pub const SELECTED_SLOT_KEY: &str = "SelectedSave";

/// Persistent integer preferences
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl Preferences {
    /// Load preferences from `path`, starting empty if the file is missing
    pub fn load(path: PathBuf) -> Result<Self, SaveError> {
        let values: BTreeMap<String, i64> = read_json(&path)?;
        Ok(Self { path, values })
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    /// Set a value and write the file immediately
    pub fn set_int(&mut self, key: &str, value: i64) -> Result<(), SaveError> {
        self.values.insert(key.to_string(), value);
        write_json_atomic(&self.path, &self.values)
    }

    /// The selected slot, or 0 when none was ever selected
    ///
    /// Negative or out-of-range stored values also read as 0.
    pub fn selected_slot(&self) -> u32 {
        self.get_int(SELECTED_SLOT_KEY)
            .and_then(|i| u32::try_from(i).ok())
            .unwrap_or(0)
    }

    pub fn set_selected_slot(&mut self, index: u32) -> Result<(), SaveError> {
        self.set_int(SELECTED_SLOT_KEY, i64::from(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_selected_slot() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = Preferences::load(temp_dir.path().join("prefs.json")).unwrap();

        assert_eq!(prefs.get_int(SELECTED_SLOT_KEY), None);
        assert_eq!(prefs.selected_slot(), 0);
    }

    #[test]
    fn test_selected_slot_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");

        let mut prefs = Preferences::load(path.clone()).unwrap();
        prefs.set_selected_slot(4).unwrap();

        let reloaded = Preferences::load(path.clone()).unwrap();
        assert_eq!(reloaded.selected_slot(), 4);

        let raw = std::fs::read_to_string(path).unwrap();
        assert!(raw.contains("\"SelectedSave\": 4"));
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = Preferences::load(path);
        assert!(matches!(result, Err(SaveError::Json(_))));
    }

    #[test]
    fn test_negative_slot_reads_as_zero() {
        let temp_dir = TempDir::new().unwrap();
        let mut prefs = Preferences::load(temp_dir.path().join("prefs.json")).unwrap();

        prefs.set_int(SELECTED_SLOT_KEY, -3).unwrap();
        assert_eq!(prefs.selected_slot(), 0);
    }
}
