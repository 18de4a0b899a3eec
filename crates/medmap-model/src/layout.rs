//! Column naming conventions and category options.

use serde::{Deserialize, Serialize};

/// Names of the fields the engine reads from a record batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    /// Free-text insurance plan field rewritten by substitution rules.
    pub insurance_plan: String,
    /// Name prefix marking diagnosis fields (e.g. "Diagnosis 1", "Diagnosis 2").
    pub diagnosis_prefix: String,
    /// Procedure code field fed to category assignment.
    pub procedure_code: String,
    /// Field holding the origin tag of each record.
    pub source: String,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            insurance_plan: "Insurance Name Plan1".to_string(),
            diagnosis_prefix: "Diagnosis".to_string(),
            procedure_code: "Procedure Code".to_string(),
            source: "Source".to_string(),
        }
    }
}

impl ColumnLayout {
    /// Whether a field name carries the diagnosis prefix (case-insensitive).
    pub fn is_diagnosis_column(&self, name: &str) -> bool {
        let prefix = self.diagnosis_prefix.trim();
        if prefix.is_empty() {
            return false;
        }
        name.trim()
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }
}

/// Options for building the category table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryOptions {
    /// List whitelist codes that never occur in the batch as well.
    ///
    /// Off by default: the table then only describes observed codes.
    pub include_unobserved_whitelist: bool,
}
