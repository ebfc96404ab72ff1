//! Configuration module for SaveVault
//!
//! This module provides configuration management including:
//! - Data directory and slot path resolution
//! - User settings persistence
//! - Unencrypted preferences (selected slot)

pub mod paths;
pub mod preferences;
pub mod settings;

pub use paths::SavePaths;
pub use preferences::Preferences;
pub use settings::Settings;
