//! Save slot lifecycle
//!
//! `SlotManager` is the context object every store operation goes through. It
//! owns the device key, the selected-slot preference and the active
//! [`ValueStore`], and writes the whole store back to disk after every
//! mutation.
//!
//! Nothing here is thread-safe; callers that share a manager across threads
//! must serialize access themselves.

use std::cell::OnceCell;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::config::paths::parse_slot_file_name;
use crate::config::{Preferences, SavePaths, Settings};
use crate::crypto::{decrypt_bytes, encrypt, DeviceIdSource, DeviceKey};
use crate::error::{SaveError, SaveResult};
use crate::models::{Composite, FromValue, IntoValue, Value};

use super::file_io::{read_bytes, remove_if_exists, write_bytes_atomic};
use super::store::ValueStore;

/// Called with the new slot index after an explicit slot switch
pub type ReloadHook = Box<dyn FnMut(u32)>;

/// Whether a slot's store is in memory
#[derive(Debug)]
enum SlotState {
    Unloaded,
    Loaded { index: u32, store: ValueStore },
}

/// Summary of a slot file on disk
#[derive(Debug, Clone)]
pub struct SlotInfo {
    pub index: u32,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Local>>,
    pub is_current: bool,
}

/// Owns the active slot and its persistence
pub struct SlotManager {
    paths: SavePaths,
    product_name: String,
    device: Box<dyn DeviceIdSource>,
    device_key: OnceCell<DeviceKey>,
    preferences: Preferences,
    state: SlotState,
    reload_hook: Option<ReloadHook>,
}

impl fmt::Debug for SlotManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotManager")
            .field("paths", &self.paths)
            .field("product_name", &self.product_name)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SlotManager {
    /// Create a manager; no slot is read until the first store operation
    pub fn new(
        paths: SavePaths,
        settings: &Settings,
        device: impl DeviceIdSource + 'static,
    ) -> SaveResult<Self> {
        settings.validate()?;
        let preferences = Preferences::load(paths.preferences_file())?;

        Ok(Self {
            paths,
            product_name: settings.product_name.clone(),
            device: Box::new(device),
            device_key: OnceCell::new(),
            preferences,
            state: SlotState::Unloaded,
            reload_hook: None,
        })
    }

    /// Register a callback fired after `select_slot` and the delete operations
    pub fn set_reload_hook(&mut self, hook: impl FnMut(u32) + 'static) {
        self.reload_hook = Some(Box::new(hook));
    }

    pub fn paths(&self) -> &SavePaths {
        &self.paths
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// The selected slot index from preferences
    pub fn current_index(&self) -> u32 {
        self.preferences.selected_slot()
    }

    /// Whether a store is in memory
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SlotState::Loaded { .. })
    }

    /// File path for a slot
    pub fn slot_path(&self, index: u32) -> PathBuf {
        self.paths.slot_file(&self.product_name, index)
    }

    /// The device key, derived on first use
    fn device_key(&self) -> SaveResult<&DeviceKey> {
        if let Some(key) = self.device_key.get() {
            return Ok(key);
        }
        let id = self.device.device_id()?;
        log::debug!("Derived device key");
        Ok(self.device_key.get_or_init(|| DeviceKey::derive(&id)))
    }

    /// Select a slot, loading it from disk or creating it empty
    ///
    /// The in-memory store is discarded first, so a failed load leaves the
    /// manager unloaded rather than pointing at stale data.
    pub fn select_slot(&mut self, index: u32) -> SaveResult<()> {
        self.load_slot(index)?;
        log::info!("Selected save slot {}", index);
        if let Some(hook) = self.reload_hook.as_mut() {
            hook(index);
        }
        Ok(())
    }

    fn load_slot(&mut self, index: u32) -> SaveResult<()> {
        self.preferences.set_selected_slot(index)?;
        self.state = SlotState::Unloaded;

        let path = self.slot_path(index);
        let store = match read_bytes(&path)? {
            Some(bytes) => {
                log::debug!("Reading slot {} from {}", index, path.display());
                let plaintext = decrypt_bytes(bytes, self.device_key()?.as_str())?;
                ValueStore::from_json_bytes(&plaintext)?
            }
            None => {
                log::debug!("Slot {} has no file, creating it", index);
                let store = ValueStore::new();
                self.write_store(index, &store)?;
                store
            }
        };

        self.state = SlotState::Loaded { index, store };
        Ok(())
    }

    /// Load the current slot if nothing is in memory
    pub fn ensure_loaded(&mut self) -> SaveResult<&mut ValueStore> {
        if !self.is_loaded() {
            let index = self.current_index();
            self.load_slot(index)?;
        }
        match &mut self.state {
            SlotState::Loaded { store, .. } => Ok(store),
            SlotState::Unloaded => Err(SaveError::Storage("Slot failed to load".into())),
        }
    }

    /// Delete a slot's file, then select `fallback`
    pub fn delete_slot(&mut self, index: u32, fallback: u32) -> SaveResult<()> {
        if remove_if_exists(self.slot_path(index))? {
            log::info!("Deleted save slot {}", index);
        }
        if matches!(self.state, SlotState::Loaded { index: loaded, .. } if loaded == index) {
            self.state = SlotState::Unloaded;
        }
        self.select_slot(fallback)
    }

    /// Delete the selected slot, then select `fallback`
    pub fn delete_current_slot(&mut self, fallback: u32) -> SaveResult<()> {
        let index = self.current_index();
        self.delete_slot(index, fallback)
    }

    /// True if the slot file is absent or zero-length
    pub fn is_slot_empty(&self, index: u32) -> SaveResult<bool> {
        let path = self.slot_path(index);
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(SaveError::Io(format!(
                "Failed to stat {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Slot files present on disk, ordered by index
    pub fn list_slots(&self) -> SaveResult<Vec<SlotInfo>> {
        let dir = self.paths.saves_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let current = self.current_index();
        let mut slots = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(index) = name
                .to_str()
                .and_then(|n| parse_slot_file_name(&self.product_name, n))
            else {
                continue;
            };

            let meta = entry.metadata()?;
            slots.push(SlotInfo {
                index,
                path: entry.path(),
                size_bytes: meta.len(),
                modified: meta.modified().ok().map(DateTime::<Local>::from),
                is_current: index == current,
            });
        }

        slots.sort_by_key(|s| s.index);
        Ok(slots)
    }

    /// Encrypt and write the in-memory store
    pub fn flush(&mut self) -> SaveResult<()> {
        if let SlotState::Loaded { index, store } = &self.state {
            self.write_store(*index, store)?;
        }
        Ok(())
    }

    fn write_store(&self, index: u32, store: &ValueStore) -> SaveResult<()> {
        let plaintext = store.to_json_bytes()?;
        let blob = encrypt(&plaintext, self.device_key()?.as_str())?;
        let path = self.slot_path(index);
        write_bytes_atomic(&path, blob.as_bytes())?;
        log::debug!(
            "Saved {} entries to slot {} ({} bytes)",
            store.len(),
            index,
            blob.len()
        );
        Ok(())
    }

    /// Read-only access to the active store
    pub fn store(&mut self) -> SaveResult<&ValueStore> {
        self.ensure_loaded().map(|store| &*store)
    }

    pub fn get<T: FromValue>(&mut self, key: &str, default: T) -> SaveResult<T> {
        Ok(self.ensure_loaded()?.get(key, default))
    }

    pub fn try_get<T: FromValue>(&mut self, key: &str) -> SaveResult<Option<T>> {
        self.ensure_loaded()?.try_get(key)
    }

    pub fn get_raw(&mut self, key: &str) -> SaveResult<Option<Value>> {
        Ok(self.ensure_loaded()?.get_raw(key).cloned())
    }

    pub fn get_array<T: Composite>(
        &mut self,
        key: &str,
        defaults: Option<&[T]>,
    ) -> SaveResult<Vec<T>> {
        Ok(self.ensure_loaded()?.get_array(key, defaults))
    }

    pub fn has(&mut self, key: &str) -> SaveResult<bool> {
        Ok(self.ensure_loaded()?.has(key))
    }

    /// Set a value and persist the slot
    pub fn set<T: IntoValue>(&mut self, key: &str, value: T) -> SaveResult<()> {
        self.commit(|store| store.set(key, value))
    }

    /// Set an array and persist the slot
    pub fn set_array<T: Composite>(&mut self, key: &str, items: Vec<T>) -> SaveResult<()> {
        self.set(key, items)
    }

    /// Remove a key and persist the slot; returns whether it existed
    pub fn delete_key(&mut self, key: &str) -> SaveResult<bool> {
        self.commit(|store| Ok(store.delete(key)))
    }

    /// Flip a bool and persist the slot; returns the new value
    pub fn toggle_bool(&mut self, key: &str) -> SaveResult<bool> {
        self.commit(|store| store.toggle_bool(key))
    }

    /// Apply a change to a copy of the active store and keep it only once
    /// it is on disk
    fn commit<R>(
        &mut self,
        change: impl FnOnce(&mut ValueStore) -> SaveResult<R>,
    ) -> SaveResult<R> {
        let mut staged = self.ensure_loaded()?.clone();
        let result = change(&mut staged)?;

        let index = match &self.state {
            SlotState::Loaded { index, .. } => *index,
            SlotState::Unloaded => return Err(SaveError::Storage("Slot failed to load".into())),
        };
        self.write_store(index, &staged)?;
        if let SlotState::Loaded { store, .. } = &mut self.state {
            *store = staged;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::FixedDeviceId;
    use crate::models::{Quat, Vec2};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn manager_for(temp_dir: &TempDir, device: &str) -> SlotManager {
        let paths = SavePaths::with_base_dir(temp_dir.path().to_path_buf());
        SlotManager::new(paths, &Settings::default(), FixedDeviceId::new(device)).unwrap()
    }

    #[test]
    fn test_scenario_set_get_delete() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");

        slots.set("score", 42i64).unwrap();
        assert_eq!(slots.get("score", 0i64).unwrap(), 42);

        assert!(slots.delete_key("score").unwrap());
        assert_eq!(slots.get("score", 0i64).unwrap(), 0);
    }

    #[test]
    fn test_lazy_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");

        assert!(!slots.is_loaded());
        assert!(slots.is_slot_empty(0).unwrap());

        assert!(!slots.has("anything").unwrap());
        assert!(slots.is_loaded());
        // Loading a missing slot materializes an empty encrypted file
        assert!(!slots.is_slot_empty(0).unwrap());
    }

    #[test]
    fn test_values_persist_across_managers() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut slots = manager_for(&temp_dir, "device-A");
            slots.set("name", "Ada").unwrap();
            slots.set("spawn", Vec2::new(4.0, -2.0)).unwrap();
        }

        let mut slots = manager_for(&temp_dir, "device-A");
        assert_eq!(slots.get("name", String::new()).unwrap(), "Ada");
        assert_eq!(slots.get("spawn", Vec2::ZERO).unwrap(), Vec2::new(4.0, -2.0));
    }

    #[test]
    fn test_file_is_encrypted() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");
        slots.set("secret_key_name", "plain text value").unwrap();

        let bytes = fs::read(slots.slot_path(0)).unwrap();
        assert!(bytes.len() >= crate::crypto::HEADER_SIZE + 16);
        let haystack = String::from_utf8_lossy(&bytes);
        assert!(!haystack.contains("secret_key_name"));
        assert!(!haystack.contains("plain text value"));
    }

    #[test]
    fn test_slot_isolation() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");

        slots.set("x", 1i64).unwrap();
        slots.select_slot(1).unwrap();
        assert!(!slots.has("x").unwrap());

        slots.select_slot(0).unwrap();
        assert_eq!(slots.get("x", 0i64).unwrap(), 1);
    }

    #[test]
    fn test_selection_persists() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut slots = manager_for(&temp_dir, "device-A");
            slots.select_slot(3).unwrap();
            slots.set("level", 9i64).unwrap();
        }

        let mut slots = manager_for(&temp_dir, "device-A");
        assert_eq!(slots.current_index(), 3);
        assert_eq!(slots.get("level", 0i64).unwrap(), 9);
    }

    #[test]
    fn test_empty_slot_semantics() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");
        slots.select_slot(2).unwrap();

        assert!(slots.is_slot_empty(5).unwrap());
        slots.delete_slot(5, 5).unwrap();
        // select_slot(5) created it
        assert!(!slots.is_slot_empty(5).unwrap());

        fs::write(slots.slot_path(6), b"").unwrap();
        assert!(slots.is_slot_empty(6).unwrap());
    }

    #[test]
    fn test_delete_slot_selects_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");

        slots.select_slot(1).unwrap();
        slots.set("x", 1i64).unwrap();
        slots.delete_slot(1, 0).unwrap();

        assert_eq!(slots.current_index(), 0);
        assert!(!slots.slot_path(1).exists());

        slots.select_slot(1).unwrap();
        assert!(!slots.has("x").unwrap());
    }

    #[test]
    fn test_delete_current_slot() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");

        slots.select_slot(2).unwrap();
        slots.set("gold", 100i64).unwrap();
        slots.delete_current_slot(2).unwrap();

        assert_eq!(slots.current_index(), 2);
        assert_eq!(slots.get("gold", 0i64).unwrap(), 0);
    }

    #[test]
    fn test_wrong_device_cannot_read() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut slots = manager_for(&temp_dir, "device-A");
            for i in 0..4 {
                slots.set(&format!("k{}", i), i64::from(i)).unwrap();
            }
        }

        let mut slots = manager_for(&temp_dir, "device-B");
        let err = slots.has("k0").unwrap_err();
        // Padding almost always rejects; if it slips through the JSON will not parse
        assert!(err.is_corrupt_slot());
        assert!(!slots.is_loaded());
    }

    #[test]
    fn test_flush_rewrites_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");
        slots.set("gems", 9i64).unwrap();

        fs::remove_file(slots.slot_path(0)).unwrap();
        slots.flush().unwrap();

        let mut reopened = manager_for(&temp_dir, "device-A");
        assert_eq!(reopened.get("gems", 0i64).unwrap(), 9);
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");
        slots.set("a", 1i64).unwrap();
        slots.set("flag", false).unwrap();

        // A directory in place of the slot file makes the rename fail
        let path = slots.slot_path(0);
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(matches!(slots.set("b", 2i64), Err(SaveError::Storage(_))));
        assert!(!slots.has("b").unwrap());
        assert_eq!(slots.get("b", 0i64).unwrap(), 0);

        assert!(slots.delete_key("a").is_err());
        assert!(slots.has("a").unwrap());

        assert!(slots.toggle_bool("flag").is_err());
        assert!(!slots.get("flag", true).unwrap());

        // Once writes work again only committed values reach disk
        fs::remove_dir(&path).unwrap();
        slots.set("c", 3i64).unwrap();
        let mut reopened = manager_for(&temp_dir, "device-A");
        assert_eq!(reopened.get("a", 0i64).unwrap(), 1);
        assert!(!reopened.has("b").unwrap());
        assert_eq!(reopened.get("c", 0i64).unwrap(), 3);
    }

    #[test]
    fn test_truncated_file_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");
        slots.set("x", 1i64).unwrap();

        fs::write(slots.slot_path(0), [0u8; 10]).unwrap();
        slots.select_slot(1).unwrap();

        let err = slots.select_slot(0).unwrap_err();
        assert!(matches!(err, SaveError::MalformedBlob { len: 10 }));
    }

    #[test]
    fn test_reload_hook_fires_on_switch() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        slots.set_reload_hook(move |index| sink.borrow_mut().push(index));

        // Lazy load does not count as a switch
        slots.set("x", 1i64).unwrap();
        slots.select_slot(4).unwrap();
        slots.delete_slot(4, 1).unwrap();

        assert_eq!(*seen.borrow(), vec![4, 1]);
    }

    #[test]
    fn test_arrays_and_toggle() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");

        slots
            .set_array("rotations", vec![Quat::IDENTITY, Quat::from_xyzw(0.0, 1.0, 0.0, 0.0)])
            .unwrap();
        let rotations: Vec<Quat> = slots.get_array("rotations", None).unwrap();
        assert_eq!(rotations.len(), 2);
        assert_eq!(rotations[1], Quat::from_xyzw(0.0, 1.0, 0.0, 0.0));

        assert!(slots.toggle_bool("muted").unwrap());
        assert!(slots.get("muted", false).unwrap());
    }

    #[test]
    fn test_list_slots() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = manager_for(&temp_dir, "device-A");

        slots.select_slot(2).unwrap();
        slots.select_slot(0).unwrap();
        fs::write(slots.paths().saves_dir().join("unrelated.txt"), b"x").unwrap();

        let listed = slots.list_slots().unwrap();
        let indices: Vec<u32> = listed.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert!(listed[0].is_current);
        assert!(!listed[1].is_current);
        assert!(listed[1].size_bytes > 0);
    }
}
