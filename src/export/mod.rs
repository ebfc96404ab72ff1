//! Export module for SaveVault
//!
//! Dumps the decrypted contents of a slot in multiple formats:
//! - CSV: one row per entry (spreadsheet-compatible)
//! - JSON: machine-readable snapshot
//! - YAML: human-readable snapshot

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_slot_csv;
pub use json::{export_slot_json, SlotExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_slot_yaml;
