//! Storage layer for SaveVault
//!
//! Provides the in-memory value store, the slot manager that encrypts it to
//! disk, and atomic file helpers.

pub mod file_io;
pub mod slots;
pub mod store;

pub use file_io::{read_json, write_json_atomic};
pub use slots::{ReloadHook, SlotInfo, SlotManager};
pub use store::ValueStore;

use crate::config::{SavePaths, Settings};
use crate::crypto::{DeviceIdSource, FixedDeviceId, InstallationId, MachineId};
use crate::error::SaveError;

/// Open a slot manager with the default device identity for this machine
///
/// Uses `device_id` when given, otherwise the OS machine id with a generated
/// installation id as fallback.
pub fn open(
    paths: SavePaths,
    settings: &Settings,
    device_id: Option<String>,
) -> Result<SlotManager, SaveError> {
    paths.ensure_directories()?;

    let source: Box<dyn DeviceIdSource> = match device_id {
        Some(id) => Box::new(FixedDeviceId::new(id)),
        None => Box::new(MachineId::new(InstallationId::new(
            paths.installation_id_file(),
        ))),
    };

    SlotManager::new(paths, settings, source)
}
