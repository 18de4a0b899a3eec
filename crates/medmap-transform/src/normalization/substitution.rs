//! Ordered "contains -> replace" rules for free-text fields.

use medmap_model::SubstitutionTable;

/// Apply every substitution rule to a value, in table order.
///
/// Each rule is tested against the *current* value, not the original: when a
/// rule's pattern occurs in the lowercased value, the whole value becomes the
/// rule's replacement and later rules see that replacement. The last matching
/// rule therefore decides the result. A value no rule matches is returned
/// unchanged.
///
/// ```
/// use medmap_model::SubstitutionTable;
/// use medmap_transform::apply_substitutions;
///
/// let table = SubstitutionTable::from_pairs([("a", "X"), ("x", "Y")]).unwrap();
/// assert_eq!(apply_substitutions("cat", &table), "Y");
/// assert_eq!(apply_substitutions("dog", &table), "dog");
/// ```
pub fn apply_substitutions(value: &str, table: &SubstitutionTable) -> String {
    let mut current = value.to_string();
    let mut lowered = current.to_lowercase();
    for rule in table.rules() {
        if lowered.contains(rule.pattern.as_str()) {
            current.clone_from(&rule.replacement);
            lowered = current.to_lowercase();
        }
    }
    current
}
