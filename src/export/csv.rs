//! CSV Export functionality
//!
//! One row per entry: key, type, value. Composite values appear as their
//! stored string encoding.

use std::io::Write;

use crate::error::{SaveError, SaveResult};
use crate::export::json::SlotExport;

/// Export slot entries to CSV
pub fn export_slot_csv<W: Write>(export: &SlotExport, writer: &mut W) -> SaveResult<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["Key", "Type", "Value"])
        .map_err(|e| SaveError::Export(e.to_string()))?;

    for (key, value) in &export.entries {
        let rendered = value.to_string();
        csv_writer
            .write_record([key.as_str(), value.type_name(), rendered.as_str()])
            .map_err(|e| SaveError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| SaveError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vec2;
    use crate::storage::ValueStore;

    #[test]
    fn test_csv_export() {
        let mut store = ValueStore::new();
        store.set("score", 42i64).unwrap();
        store.set("spawn", Vec2::new(1.0, 2.0)).unwrap();

        let export = SlotExport::from_store(&store, "SaveVault", 0);
        let mut output = Vec::new();
        export_slot_csv(&export, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Key,Type,Value");
        assert_eq!(lines[1], "score,int,42");
        // Comma inside the value gets quoted
        assert_eq!(lines[2], "spawn,string,\"1,2\"");
    }
}
