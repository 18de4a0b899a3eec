//! Mapping tables loaded once per run.
//!
//! Both tables keep their rows in load order. Order matters: every rule is
//! applied to the output of the rules before it, so a table is a program, not
//! a lookup set.

use serde::Serialize;

use medmap_common::normalize_label;

use crate::error::{ModelError, Result};
use crate::whitelist::CategoryWhitelist;

/// A single "contains -> replace" rule for free-text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubstitutionRule {
    /// Lowercase substring tested against the lowercased field value.
    pub pattern: String,
    /// Text that replaces the whole field value on a match.
    pub replacement: String,
}

impl SubstitutionRule {
    /// Create a rule, lowercasing the pattern.
    ///
    /// An empty pattern would match every value and is rejected.
    pub fn new(pattern: impl AsRef<str>, replacement: impl Into<String>) -> Result<Self> {
        let pattern = pattern.as_ref().to_lowercase();
        let replacement = replacement.into();
        if pattern.is_empty() {
            return Err(ModelError::EmptyPattern { replacement });
        }
        Ok(Self {
            pattern,
            replacement,
        })
    }
}

/// Ordered substitution rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubstitutionTable {
    rules: Vec<SubstitutionRule>,
}

impl SubstitutionTable {
    pub fn new(rules: Vec<SubstitutionRule>) -> Self {
        Self { rules }
    }

    /// Build a table from `(pattern, replacement)` pairs.
    pub fn from_pairs<P, R>(pairs: impl IntoIterator<Item = (P, R)>) -> Result<Self>
    where
        P: AsRef<str>,
        R: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .map(|(pattern, replacement)| SubstitutionRule::new(pattern, replacement))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// An exact-match replacement for normalized labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExactMapEntry {
    /// Source label in normalized (trimmed, title-cased) form.
    pub source: String,
    /// Replacement written verbatim.
    pub destination: String,
}

impl ExactMapEntry {
    /// Create an entry, normalizing the source label.
    pub fn new(source: impl AsRef<str>, destination: impl Into<String>) -> Result<Self> {
        let source = normalize_label(source.as_ref());
        let destination = destination.into();
        if source.is_empty() {
            return Err(ModelError::EmptySource { destination });
        }
        Ok(Self {
            source,
            destination,
        })
    }

    /// Whether the destination survives normalization unchanged.
    ///
    /// Re-running the pipeline over its own output is only a fixed point when
    /// every destination is already in normalized form.
    pub fn destination_is_normalized(&self) -> bool {
        normalize_label(&self.destination) == self.destination
    }
}

/// Exact-map entries in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExactMapTable {
    entries: Vec<ExactMapEntry>,
}

impl ExactMapTable {
    pub fn new(entries: Vec<ExactMapEntry>) -> Self {
        Self { entries }
    }

    /// Build a table from `(source, destination)` pairs.
    pub fn from_pairs<S, D>(pairs: impl IntoIterator<Item = (S, D)>) -> Result<Self>
    where
        S: AsRef<str>,
        D: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(source, destination)| ExactMapEntry::new(source, destination))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[ExactMapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalized sources that appear more than once. Only the first
    /// occurrence can ever match.
    pub fn duplicate_sources(&self) -> Vec<&str> {
        let mut seen = std::collections::BTreeSet::new();
        let mut duplicates = Vec::new();
        for entry in &self.entries {
            if !seen.insert(entry.source.as_str()) && !duplicates.contains(&entry.source.as_str())
            {
                duplicates.push(entry.source.as_str());
            }
        }
        duplicates
    }
}

/// Everything a run needs besides the data itself.
///
/// Built once before any record is touched and shared by reference; nothing
/// mutates it afterwards.
#[derive(Debug, Clone, Default)]
pub struct NormalizationTables {
    pub substitutions: SubstitutionTable,
    pub exact_map: ExactMapTable,
    pub whitelist: CategoryWhitelist,
}

impl NormalizationTables {
    pub fn new(
        substitutions: SubstitutionTable,
        exact_map: ExactMapTable,
        whitelist: CategoryWhitelist,
    ) -> Self {
        Self {
            substitutions,
            exact_map,
            whitelist,
        }
    }
}
