//! Display formatting for terminal output
//!
//! Plain-text tables for slot entries and slot files.

pub mod entries;
pub mod slots;

pub use entries::format_entry_list;
pub use slots::format_slot_list;
