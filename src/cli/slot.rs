//! Slot CLI commands
//!
//! Implements CLI commands for selecting, inspecting and deleting save slots.

use clap::Subcommand;

use crate::display::format_slot_list;
use crate::error::SaveResult;
use crate::storage::SlotManager;

/// Slot subcommands
#[derive(Subcommand)]
pub enum SlotCommands {
    /// Make a slot current, creating it if needed
    Select {
        /// Slot index
        index: u32,
    },

    /// Delete a slot file
    Delete {
        /// Slot index
        index: u32,
        /// Slot to load afterwards (defaults to the configured fallback)
        #[arg(short, long)]
        load: Option<u32>,
    },

    /// Delete the current slot file
    #[command(name = "delete-current")]
    DeleteCurrent {
        /// Slot to load afterwards (defaults to the configured fallback)
        #[arg(short, long)]
        load: Option<u32>,
    },

    /// List slot files on disk
    #[command(alias = "ls")]
    List,

    /// Check whether a slot has no saved data
    Empty {
        /// Slot index
        index: u32,
    },

    /// Print the current slot index
    Current,
}

/// Handle a slot command
pub fn handle_slot_command(
    slots: &mut SlotManager,
    fallback_slot: u32,
    cmd: SlotCommands,
) -> SaveResult<()> {
    match cmd {
        SlotCommands::Select { index } => {
            slots.select_slot(index)?;
        }

        SlotCommands::Delete { index, load } => {
            slots.delete_slot(index, load.unwrap_or(fallback_slot))?;
            println!("Deleted slot {}", index);
        }

        SlotCommands::DeleteCurrent { load } => {
            let index = slots.current_index();
            slots.delete_current_slot(load.unwrap_or(fallback_slot))?;
            println!("Deleted slot {}", index);
        }

        SlotCommands::List => {
            let list = slots.list_slots()?;
            print!("{}", format_slot_list(&list));
            if list.is_empty() {
                println!();
            }
        }

        SlotCommands::Empty { index } => {
            println!("{}", slots.is_slot_empty(index)?);
        }

        SlotCommands::Current => {
            println!("{}", slots.current_index());
        }
    }

    Ok(())
}
