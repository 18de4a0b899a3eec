//! Extracted codes and the reports derived from them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Category label shared by every procedure code outside the whitelist.
pub const OTHERS_CATEGORY: &str = "Others";

/// A free-text value and the bracketed code found in it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedCode {
    pub raw_text: String,
    pub code: Option<String>,
}

impl ExtractedCode {
    pub fn new(raw_text: impl Into<String>, code: Option<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            code,
        }
    }
}

/// Every distinct description observed for one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictGroup {
    pub code: String,
    pub descriptions: BTreeSet<String>,
}

impl ConflictGroup {
    /// A code is ambiguous when it was seen with more than one description.
    pub fn is_ambiguous(&self) -> bool {
        self.descriptions.len() > 1
    }
}

/// Ambiguous codes found in one batch, sorted by code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub groups: Vec<ConflictGroup>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of ambiguous codes.
    pub fn code_count(&self) -> usize {
        self.groups.len()
    }

    /// Flattened `(code, description)` rows, one per distinct description.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.groups.iter().flat_map(|group| {
            group
                .descriptions
                .iter()
                .map(move |description| (group.code.as_str(), description.as_str()))
        })
    }

    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|group| group.descriptions.len()).sum()
    }
}

/// Category and ordinal assigned to one procedure code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAssignment {
    pub code: String,
    pub category: String,
    pub order: u32,
}

impl CategoryAssignment {
    pub fn is_others(&self) -> bool {
        self.category == OTHERS_CATEGORY
    }
}
