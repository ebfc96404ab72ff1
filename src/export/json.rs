//! JSON Export functionality
//!
//! Exports the decrypted contents of a slot with schema versioning.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SaveError, SaveResult};
use crate::models::Value;
use crate::storage::ValueStore;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Decrypted snapshot of one slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Product the slot belongs to
    pub product_name: String,

    /// Slot index
    pub slot: u32,

    /// All entries, sorted by key
    pub entries: BTreeMap<String, Value>,
}

impl SlotExport {
    /// Snapshot a store
    pub fn from_store(store: &ValueStore, product_name: &str, slot: u32) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            product_name: product_name.to_string(),
            slot,
            entries: store
                .entries()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }
}

/// Export a slot as pretty-printed JSON
pub fn export_slot_json<W: Write>(export: &SlotExport, writer: &mut W) -> SaveResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)
        .map_err(|e| SaveError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| SaveError::Export(e.to_string()))?;
    Ok(())
}
