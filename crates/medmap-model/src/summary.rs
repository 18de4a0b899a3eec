//! Run summary written next to the outputs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-source record counts, input files and output location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: String,
    pub records: usize,
    /// Files whose rows carry this source tag.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Counts describing one run, serialized as `summary.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub sources: Vec<SourceSummary>,
    pub total_records: usize,
    pub insurance_values_changed: usize,
    pub diagnosis_values_changed: usize,
    pub diagnosis_columns: Vec<String>,
    pub extracted_codes: usize,
    pub unparsable_values: usize,
    pub ambiguous_codes: usize,
    pub category_rows: usize,
    pub others_codes: usize,
}

impl RunSummary {
    pub fn has_ambiguous_codes(&self) -> bool {
        self.ambiguous_codes > 0
    }
}
