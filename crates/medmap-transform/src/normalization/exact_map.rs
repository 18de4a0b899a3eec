//! Exact-match replacement of normalized labels.

use medmap_common::normalize_label;
use medmap_model::ExactMapTable;

/// Normalize a label and replace it through the exact-map table.
///
/// The value is trimmed and title-cased first. Entries are then applied in
/// table order against the current value, so an entry whose source equals an
/// earlier entry's destination rewrites it again. Values matching no entry
/// come back in normalized form.
///
/// ```
/// use medmap_model::ExactMapTable;
/// use medmap_transform::apply_exact_map;
///
/// let table = ExactMapTable::from_pairs([("flu", "Influenza [J11]")]).unwrap();
/// assert_eq!(apply_exact_map("  FLU ", &table), "Influenza [J11]");
/// assert_eq!(apply_exact_map("cough", &table), "Cough");
/// ```
pub fn apply_exact_map(value: &str, table: &ExactMapTable) -> String {
    let mut current = normalize_label(value);
    for entry in table.entries() {
        if current == entry.source {
            current.clone_from(&entry.destination);
        }
    }
    current
}
