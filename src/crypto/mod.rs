//! Cryptographic functions for SaveVault
//!
//! Provides AES-256-CBC encryption with PBKDF2 key derivation, keyed by a
//! passphrase derived from the device identity.

pub mod device_key;
pub mod encryption;
pub mod key_derivation;

pub use device_key::{DeviceIdSource, DeviceKey, FixedDeviceId, InstallationId, MachineId};
pub use encryption::{decrypt, decrypt_bytes, encrypt, EncryptedBlob, HEADER_SIZE, IV_SIZE};
pub use key_derivation::{derive_key, DerivedKey, SALT_SIZE};
