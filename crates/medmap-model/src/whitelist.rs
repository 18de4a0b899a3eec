//! Procedure-code category whitelist.

use serde::Serialize;

use crate::codes::OTHERS_CATEGORY;
use crate::error::{ModelError, Result};

/// Procedure codes that receive their own category, as a comma-separated list.
///
/// Office and preventive evaluation-and-management visits; everything else is
/// reported under [`OTHERS_CATEGORY`]. Override through the run configuration.
pub const DEFAULT_CATEGORY_WHITELIST: &str = "99202,99203,99204,99205,99211,99212,99213,99214,\
                                              99215,99381,99391,99395,99396";

/// Whitelisted procedure codes, deduplicated, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryWhitelist {
    codes: Vec<String>,
}

fn split_entries(raw: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for entry in raw.split(',') {
        let trimmed = entry.trim();
        if trimmed.is_empty() || codes.iter().any(|code| code == trimmed) {
            continue;
        }
        codes.push(trimmed.to_string());
    }
    codes
}

impl CategoryWhitelist {
    /// Parse a comma-separated whitelist. Blank entries and repeats are dropped.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::from_codes(split_entries(raw))
    }

    /// Build a whitelist from individual codes.
    pub fn from_codes<I, S>(codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for code in codes {
            let code = code.into().trim().to_string();
            if code.is_empty() || unique.contains(&code) {
                continue;
            }
            if code == OTHERS_CATEGORY {
                return Err(ModelError::ReservedCategory(code));
            }
            unique.push(code);
        }
        Ok(Self { codes: unique })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for CategoryWhitelist {
    fn default() -> Self {
        Self {
            codes: split_entries(DEFAULT_CATEGORY_WHITELIST),
        }
    }
}
