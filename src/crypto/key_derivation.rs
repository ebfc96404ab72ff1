//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Derives the per-blob cipher key from the device passphrase and the salt
//! stored at the front of every encrypted blob.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Salt length in bytes
pub const SALT_SIZE: usize = 32;

/// Derived key length in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 10_000;

/// A derived encryption key
///
/// Zeroed when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey").finish_non_exhaustive()
    }
}

/// Derive an encryption key from a password and salt
pub fn derive_key(password: &str, salt: &[u8]) -> DerivedKey {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    DerivedKey { key }
}
