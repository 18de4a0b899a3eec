//! Payer fee schedule layouts.
//!
//! Every payer publishes its fee schedule in its own shape. A
//! [`FeeScheduleSource`] says where one schedule lives, which of its rows
//! count and which columns hold the procedure, amount and modifier, so that
//! all schedules can be merged into `PROCEDURE, Amount, Key_FS, Source` rows.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Procedure code column of the merged fee schedule.
pub const FEE_PROCEDURE_COLUMN: &str = "PROCEDURE";
/// Amount column of the merged fee schedule.
pub const FEE_AMOUNT_COLUMN: &str = "Amount";
/// Procedure plus modifier lookup key.
pub const FEE_KEY_COLUMN: &str = "Key_FS";
/// Payer tag column of the merged fee schedule.
pub const FEE_SOURCE_COLUMN: &str = "Source";

/// Modifier cell values that mean "no modifier".
pub const DEFAULT_MISSING_MODIFIERS: &[&str] = &["nan", "N/A"];

/// Row condition applied to a raw fee schedule.
///
/// Blank cells count as null. A null cell never equals a value and always
/// differs from one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RowFilter {
    Equals { column: String, value: String },
    NotEquals { column: String, value: String },
    IsNull { column: String },
    NotNull { column: String },
}

impl RowFilter {
    pub fn column(&self) -> &str {
        match self {
            Self::Equals { column, .. }
            | Self::NotEquals { column, .. }
            | Self::IsNull { column }
            | Self::NotNull { column } => column,
        }
    }

    /// Whether a row whose cell in [`RowFilter::column`] is `cell` is kept.
    ///
    /// ```
    /// use medmap_model::RowFilter;
    ///
    /// let note = RowFilter::NotEquals { column: "NOTE".into(), value: "#".into() };
    /// assert!(note.keeps(None));
    /// assert!(note.keeps(Some("see policy")));
    /// assert!(!note.keeps(Some("#")));
    /// ```
    pub fn keeps(&self, cell: Option<&str>) -> bool {
        let cell = cell.map(str::trim).filter(|value| !value.is_empty());
        match self {
            Self::Equals { value, .. } => cell == Some(value.trim()),
            Self::NotEquals { value, .. } => cell != Some(value.trim()),
            Self::IsNull { .. } => cell.is_none(),
            Self::NotNull { .. } => cell.is_some(),
        }
    }
}

/// One payer's fee schedule and how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeeScheduleSource {
    /// Payer tag written to the `Source` column.
    pub source: String,
    /// CSV file holding the schedule.
    pub path: PathBuf,
    /// Preamble lines above the header row.
    #[serde(default)]
    pub skip_rows: usize,
    /// Column renamed to `PROCEDURE`.
    pub procedure_column: String,
    /// Column renamed to `Amount`.
    pub amount_column: String,
    /// Column appended to the procedure code in `Key_FS`.
    #[serde(default)]
    pub modifier_column: Option<String>,
    #[serde(default = "default_missing_modifiers")]
    pub missing_modifiers: Vec<String>,
    /// Conditions every kept row must meet.
    #[serde(default)]
    pub filters: Vec<RowFilter>,
}

fn default_missing_modifiers() -> Vec<String> {
    DEFAULT_MISSING_MODIFIERS
        .iter()
        .map(|value| (*value).to_string())
        .collect()
}

impl FeeScheduleSource {
    pub fn new(
        source: impl Into<String>,
        path: impl Into<PathBuf>,
        procedure_column: impl Into<String>,
        amount_column: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            path: path.into(),
            skip_rows: 0,
            procedure_column: procedure_column.into(),
            amount_column: amount_column.into(),
            modifier_column: None,
            missing_modifiers: default_missing_modifiers(),
            filters: Vec::new(),
        }
    }

    /// Lookup key for a procedure and its modifier cell.
    ///
    /// A null, blank or missing-marker modifier contributes nothing.
    ///
    /// ```
    /// use medmap_model::FeeScheduleSource;
    ///
    /// let schedule = FeeScheduleSource::new("VACCN", "vaccn.csv", "Procedure Code", "Facility Rate");
    /// assert_eq!(schedule.key("99213", Some("26")), "9921326");
    /// assert_eq!(schedule.key("99213", Some("N/A")), "99213");
    /// assert_eq!(schedule.key("99213", None), "99213");
    /// ```
    pub fn key(&self, procedure: &str, modifier: Option<&str>) -> String {
        let procedure = procedure.trim();
        match modifier.map(str::trim) {
            Some(modifier) if !self.is_missing_modifier(modifier) => {
                format!("{procedure}{modifier}")
            }
            _ => procedure.to_string(),
        }
    }

    fn is_missing_modifier(&self, modifier: &str) -> bool {
        modifier.is_empty()
            || self
                .missing_modifiers
                .iter()
                .any(|marker| marker.trim() == modifier)
    }
}
