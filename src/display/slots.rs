//! Slot list display formatting

use crate::storage::SlotInfo;

/// Format slot files as a table, marking the selected one
pub fn format_slot_list(slots: &[SlotInfo]) -> String {
    if slots.is_empty() {
        return "No save slots found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<2}{:>5}  {:>10}  {}\n",
        "", "Slot", "Size", "Modified"
    ));
    output.push_str(&format!("{:<2}{:->5}  {:->10}  {:-<19}\n", "", "", "", ""));

    for slot in slots {
        let marker = if slot.is_current { "*" } else { "" };
        let modified = slot
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());

        output.push_str(&format!(
            "{:<2}{:>5}  {:>10}  {}\n",
            marker,
            slot.index,
            format!("{} B", slot.size_bytes),
            modified
        ));
    }

    output
}
