//! Entry display formatting

use crate::storage::ValueStore;

/// Longest value shown before truncation
const MAX_VALUE_WIDTH: usize = 60;

/// Format all entries in a store as a table
pub fn format_entry_list(store: &ValueStore) -> String {
    if store.is_empty() {
        return "No entries in this slot.".to_string();
    }

    let key_width = store.keys().map(|k| k.chars().count()).max().unwrap_or(3).max(3);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<key_width$}  {:<6}  {}\n",
        "Key",
        "Type",
        "Value",
        key_width = key_width,
    ));
    output.push_str(&format!(
        "{:-<key_width$}  {:-<6}  {:-<5}\n",
        "",
        "",
        "",
        key_width = key_width,
    ));

    for (key, value) in store.entries() {
        output.push_str(&format!(
            "{:<key_width$}  {:<6}  {}\n",
            key,
            value.type_name(),
            printable(&value.to_string()),
            key_width = key_width,
        ));
    }

    output.push_str(&format!("\n{} entries\n", store.len()));
    output
}

/// Escape control characters (string arrays use NUL) and truncate
fn printable(value: &str) -> String {
    let escaped: String = value.chars().flat_map(char::escape_default).collect();
    if escaped.chars().count() > MAX_VALUE_WIDTH {
        let cut: String = escaped.chars().take(MAX_VALUE_WIDTH - 3).collect();
        format!("{}...", cut)
    } else {
        escaped
    }
}
