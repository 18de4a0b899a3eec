//! Shared helpers for output writers.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};

use crate::error::{OutputError, Result};

/// File name of the conflict report.
pub const CONFLICT_REPORT_FILE: &str = "duplicate_codes.csv";
/// File name of the procedure category table.
pub const CATEGORY_TABLE_FILE: &str = "procedure_categories.csv";
/// File name of the JSON run summary.
pub const RUN_SUMMARY_FILE: &str = "summary.json";
/// File name of the merged fee schedule.
pub const FEE_SCHEDULE_FILE: &str = "fee_schedule.csv";

/// Report files that share the output directory with source partitions.
pub(crate) const REPORT_FILES: &[&str] = &[
    CONFLICT_REPORT_FILE,
    CATEGORY_TABLE_FILE,
    RUN_SUMMARY_FILE,
    FEE_SCHEDULE_FILE,
];

/// Create the output directory if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| OutputError::io(dir, e))
}

/// File name for one source partition.
///
/// Path separators and other characters that are awkward in file names become
/// underscores; an empty tag becomes `unknown`.
///
/// ```
/// use medmap_output::partition_file_name;
///
/// assert_eq!(partition_file_name("clinic_a"), "clinic_a.csv");
/// assert_eq!(partition_file_name("north/east"), "north_east.csv");
/// assert_eq!(partition_file_name("  "), "unknown.csv");
/// ```
pub fn partition_file_name(source: &str) -> String {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return "unknown.csv".to_string();
    }
    let safe: String = trimmed
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.' | ' ') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}.csv")
}

pub(crate) fn open_csv(path: &Path) -> Result<Writer<fs::File>> {
    WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| OutputError::csv(path, e))
}

pub(crate) fn finish_csv(mut writer: Writer<fs::File>, path: &Path) -> Result<PathBuf> {
    writer.flush().map_err(|e| OutputError::io(path, e))?;
    Ok(path.to_path_buf())
}
