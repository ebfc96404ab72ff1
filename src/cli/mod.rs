//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the slot manager.

pub mod export;
pub mod slot;
pub mod value;

pub use export::{handle_export_command, ExportArgs};
pub use slot::{handle_slot_command, SlotCommands};
pub use value::{handle_value_command, ValueCommands};
