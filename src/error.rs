//! Custom error types for SaveVault
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for SaveVault operations
#[derive(Error, Debug)]
pub enum SaveError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON errors outside the encrypted payload (settings, preferences)
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid input supplied by the caller
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Encrypted payload is shorter than the salt + IV header
    #[error("Malformed blob: {len} bytes is shorter than the 64-byte header")]
    MalformedBlob { len: usize },

    /// Wrong password or corrupted ciphertext
    #[error("Decryption failed: invalid key or corrupted data")]
    DecryptionFailed,

    /// Decrypted bytes are not a valid value map
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// A stored value could not be converted to the requested type
    #[error("Value for key '{key}' cannot be read as {expected}")]
    KeyConversionFailed { key: String, expected: &'static str },

    /// Cipher setup errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl SaveError {
    /// Create a "not found" error for store keys
    pub fn key_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Key",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from reading an encrypted slot
    pub fn is_corrupt_slot(&self) -> bool {
        matches!(
            self,
            Self::MalformedBlob { .. } | Self::DecryptionFailed | Self::SerializationFailed(_)
        )
    }
}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for SaveVault operations
pub type SaveResult<T> = Result<T, SaveError>;
