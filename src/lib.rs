//! SaveVault - encrypted multi-slot save storage
//!
//! This library keeps small key-value saves (settings, progress, flags) in
//! numbered slot files. Each slot is a JSON object encrypted with a key
//! derived from the device identity, so copying a save to another machine
//! renders it unreadable.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, settings and the unencrypted preferences file
//! - `error`: Custom error types
//! - `crypto`: Device key derivation and the slot blob cipher
//! - `models`: Stored values and composite encodings (vectors, colors, arrays)
//! - `storage`: The value store and the slot manager
//! - `export`: JSON, YAML and CSV dumps of a slot
//! - `display`: Terminal table formatting
//! - `cli`: Command handlers for the `savevault` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use savevault::config::{SavePaths, Settings};
//! use savevault::storage;
//!
//! let paths = SavePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut slots = storage::open(paths, &settings, None)?;
//!
//! slots.set("coins", 120i64)?;
//! let coins: i64 = slots.get("coins", 0)?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod storage;

pub use error::{SaveError, SaveResult};
