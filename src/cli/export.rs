//! CLI command for slot export
//!
//! Writes the decrypted contents of the selected slot to stdout or a file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::error::{SaveError, SaveResult};
use crate::export::{export_slot_csv, export_slot_json, export_slot_yaml, SlotExport};
use crate::storage::SlotManager;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON snapshot with metadata
    Json,
    /// YAML snapshot, human-readable
    Yaml,
    /// CSV, one row per key
    Csv,
}

/// Export arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn write_export<W: Write>(
    snapshot: &SlotExport,
    format: ExportFormat,
    writer: &mut W,
) -> SaveResult<()> {
    match format {
        ExportFormat::Json => export_slot_json(snapshot, writer),
        ExportFormat::Yaml => export_slot_yaml(snapshot, writer),
        ExportFormat::Csv => export_slot_csv(snapshot, writer),
    }
}

/// Handle the export command
pub fn handle_export_command(slots: &mut SlotManager, args: ExportArgs) -> SaveResult<()> {
    let slot = slots.current_index();
    let product_name = slots.product_name().to_string();
    let snapshot = SlotExport::from_store(slots.store()?, &product_name, slot);

    match args.output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                SaveError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(&snapshot, args.format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| SaveError::Export(e.to_string()))?;

            println!(
                "Exported {} entries from slot {} to {}",
                snapshot.entries.len(),
                slot,
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_export(&snapshot, args.format, &mut handle)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SavePaths, Settings};
    use crate::crypto::FixedDeviceId;
    use tempfile::TempDir;

    #[test]
    fn test_export_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SavePaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        let mut slots =
            SlotManager::new(paths, &Settings::default(), FixedDeviceId::new("test")).unwrap();
        slots.set("level", 7i64).unwrap();

        let output = temp_dir.path().join("slot.json");
        handle_export_command(
            &mut slots,
            ExportArgs {
                format: ExportFormat::Json,
                output: Some(output.clone()),
            },
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(json["entries"]["level"], 7);
        assert_eq!(json["slot"], 0);
    }

    #[test]
    fn test_write_export_csv() {
        let mut store = crate::storage::ValueStore::new();
        store.set("lives", 3i64).unwrap();
        let snapshot = SlotExport::from_store(&store, "SaveVault", 1);

        let mut output = Vec::new();
        write_export(&snapshot, ExportFormat::Csv, &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Key,Type,Value\nlives,int,3\n"
        );
    }
}
