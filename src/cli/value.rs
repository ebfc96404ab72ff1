//! Value CLI commands
//!
//! Reads and writes keys in the selected slot.

use clap::Subcommand;

use crate::display::format_entry_list;
use crate::error::{SaveError, SaveResult};
use crate::models::Value;
use crate::storage::SlotManager;

/// Commands acting on keys of the selected slot
#[derive(Subcommand)]
pub enum ValueCommands {
    /// Print the value stored under a key
    Get {
        /// Key name
        key: String,
        /// Print this instead of failing when the key is missing
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Store a value under a key
    Set {
        /// Key name
        key: String,
        /// Value to store
        value: String,
        /// Value type (string, int, float, bool)
        #[arg(short = 't', long = "type", default_value = "string")]
        value_type: String,
    },

    /// Remove a key
    #[command(alias = "rm")]
    Delete {
        /// Key name
        key: String,
    },

    /// Check whether a key exists
    Has {
        /// Key name
        key: String,
    },

    /// Flip a boolean key (missing counts as false)
    Toggle {
        /// Key name
        key: String,
    },

    /// List every key in the selected slot
    #[command(alias = "ls")]
    List,
}

/// Handle a value command
pub fn handle_value_command(slots: &mut SlotManager, cmd: ValueCommands) -> SaveResult<()> {
    match cmd {
        ValueCommands::Get { key, default } => match (slots.get_raw(&key)?, default) {
            (Some(value), _) => println!("{}", value),
            (None, Some(default)) => println!("{}", default),
            (None, None) => return Err(SaveError::key_not_found(key)),
        },

        ValueCommands::Set {
            key,
            value,
            value_type,
        } => {
            let value = Value::parse_typed(&value, &value_type)?;
            let type_name = value.type_name();
            slots.set(&key, value)?;
            println!("Set '{}' ({}) in slot {}", key, type_name, slots.current_index());
        }

        ValueCommands::Delete { key } => {
            if slots.delete_key(&key)? {
                println!("Deleted '{}'", key);
            } else {
                return Err(SaveError::key_not_found(key));
            }
        }

        ValueCommands::Has { key } => {
            println!("{}", slots.has(&key)?);
        }

        ValueCommands::Toggle { key } => {
            let value = slots.toggle_bool(&key)?;
            println!("{} = {}", key, value);
        }

        ValueCommands::List => {
            let store = slots.store()?;
            print!("{}", format_entry_list(store));
            if store.is_empty() {
                println!();
            }
        }
    }

    Ok(())
}
