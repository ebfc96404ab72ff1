//! YAML Export functionality
//!
//! Exports a slot to YAML for human reading.

use std::io::Write;

use crate::error::{SaveError, SaveResult};
use crate::export::json::SlotExport;

/// Export a slot to YAML with a comment header
pub fn export_slot_yaml<W: Write>(export: &SlotExport, writer: &mut W) -> SaveResult<()> {
    let header = format!(
        "# SaveVault slot export\n# Product: {}\n# Slot: {}\n# Generated: {}\n#\n# Decrypted save data. Keep it private.\n\n",
        export.product_name, export.slot, export.exported_at
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| SaveError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| SaveError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ValueStore;

    #[test]
    fn test_yaml_export() {
        let mut store = ValueStore::new();
        store.set("level", 7i64).unwrap();
        store.set("hardcore", true).unwrap();

        let export = SlotExport::from_store(&store, "Space Game", 1);
        let mut output = Vec::new();
        export_slot_yaml(&export, &mut output).unwrap();

        let yaml = String::from_utf8(output).unwrap();
        assert!(yaml.starts_with("# SaveVault slot export"));
        assert!(yaml.contains("# Product: Space Game"));
        assert!(yaml.contains("level: 7"));
        assert!(yaml.contains("hardcore: true"));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut store = ValueStore::new();
        store.set("name", "Ada").unwrap();

        let export = SlotExport::from_store(&store, "SaveVault", 0);
        let mut output = Vec::new();
        export_slot_yaml(&export, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let body: String = text
            .lines()
            .filter(|line| !line.starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n");

        let back: SlotExport = serde_yaml::from_str(&body).unwrap();
        assert_eq!(back.entries.len(), 1);
        assert_eq!(back.slot, 0);
    }
}
