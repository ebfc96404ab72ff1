//! Device-bound passphrase
//!
//! The passphrase used for every slot on a machine is derived from a stable
//! device or installation identifier. It keeps save files from being trivially
//! moved between machines; it does not stop a local user who can read the
//! identifier themselves.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{SaveError, SaveResult};

/// Number of hex digits kept from the digest
const KEY_HEX_LEN: usize = 16;

/// Linux locations of the systemd/dbus machine id
const MACHINE_ID_PATHS: [&str; 2] = ["/etc/machine-id", "/var/lib/dbus/machine-id"];

/// The passphrase handed to the cipher for every slot on this device
///
/// Format: two hex digits, `-`, fourteen hex digits, `@`.
pub struct DeviceKey {
    passphrase: Zeroizing<String>,
}

impl DeviceKey {
    /// Derive the key for a device identifier
    ///
    /// An empty identifier is allowed and yields the key for the empty string.
    pub fn derive(device_id: &str) -> Self {
        let digest = Sha256::digest(device_id.as_bytes());
        let mut passphrase: String = digest
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>()
            .chars()
            .take(KEY_HEX_LEN)
            .collect();
        passphrase.insert(2, '-');
        passphrase.push('@');

        Self {
            passphrase: Zeroizing::new(passphrase),
        }
    }

    /// The passphrase string
    pub fn as_str(&self) -> &str {
        &self.passphrase
    }
}

// Never print the passphrase
impl fmt::Debug for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceKey")
            .field("len", &self.passphrase.len())
            .finish()
    }
}

/// Supplies the stable identifier the device key is derived from
pub trait DeviceIdSource {
    /// Return the identifier for this device or installation
    fn device_id(&self) -> SaveResult<String>;
}

impl<T: DeviceIdSource + ?Sized> DeviceIdSource for Box<T> {
    fn device_id(&self) -> SaveResult<String> {
        (**self).device_id()
    }
}

/// A caller-chosen identifier
#[derive(Debug, Clone)]
pub struct FixedDeviceId(String);

impl FixedDeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl DeviceIdSource for FixedDeviceId {
    fn device_id(&self) -> SaveResult<String> {
        Ok(self.0.clone())
    }
}

/// A random identifier generated on first use and stored in the data directory
#[derive(Debug, Clone)]
pub struct InstallationId {
    path: PathBuf,
}

impl InstallationId {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Where the identifier is stored
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeviceIdSource for InstallationId {
    fn device_id(&self) -> SaveResult<String> {
        if self.path.exists() {
            let id = fs::read_to_string(&self.path).map_err(|e| {
                SaveError::Io(format!(
                    "Failed to read installation id {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
            let id = id.trim();
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SaveError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&self.path, &id).map_err(|e| {
            SaveError::Io(format!(
                "Failed to write installation id {}: {}",
                self.path.display(),
                e
            ))
        })?;
        log::info!("Generated new installation id at {}", self.path.display());

        Ok(id)
    }
}

/// The OS machine id, falling back to a per-installation id
#[derive(Debug, Clone)]
pub struct MachineId {
    fallback: InstallationId,
}

impl MachineId {
    pub fn new(fallback: InstallationId) -> Self {
        Self { fallback }
    }
}

impl DeviceIdSource for MachineId {
    fn device_id(&self) -> SaveResult<String> {
        for candidate in MACHINE_ID_PATHS {
            if let Ok(contents) = fs::read_to_string(candidate) {
                let id = contents.trim();
                if !id.is_empty() {
                    log::debug!("Using machine id from {}", candidate);
                    return Ok(id.to_string());
                }
            }
        }

        log::debug!("No machine id available, using installation id");
        self.fallback.device_id()
    }
}
