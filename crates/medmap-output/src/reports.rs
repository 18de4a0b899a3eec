//! Conflict report, category table and run summary.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;

use medmap_model::{CategoryAssignment, ConflictReport, RunSummary};

use crate::common::{
    CATEGORY_TABLE_FILE, CONFLICT_REPORT_FILE, FEE_SCHEDULE_FILE, RUN_SUMMARY_FILE,
    ensure_output_dir, finish_csv, open_csv,
};
use crate::error::{OutputError, Result};
use crate::partitions::write_frame_csv;

/// Write one `Code,Description` row per distinct description of each
/// ambiguous code. An empty report still produces the header row.
pub fn write_conflict_report(output_dir: &Path, report: &ConflictReport) -> Result<PathBuf> {
    ensure_output_dir(output_dir)?;
    let path = output_dir.join(CONFLICT_REPORT_FILE);
    let mut writer = open_csv(&path)?;
    writer
        .write_record(["Code", "Description"])
        .map_err(|e| OutputError::csv(&path, e))?;
    for (code, description) in report.rows() {
        writer
            .write_record([code, description])
            .map_err(|e| OutputError::csv(&path, e))?;
    }
    finish_csv(writer, &path)
}

/// Write the `Code,Category,Order` table in assignment order.
pub fn write_category_table(
    output_dir: &Path,
    assignments: &[CategoryAssignment],
) -> Result<PathBuf> {
    ensure_output_dir(output_dir)?;
    let path = output_dir.join(CATEGORY_TABLE_FILE);
    let mut writer = open_csv(&path)?;
    writer
        .write_record(["Code", "Category", "Order"])
        .map_err(|e| OutputError::csv(&path, e))?;
    for assignment in assignments {
        let order = assignment.order.to_string();
        writer
            .write_record([
                assignment.code.as_str(),
                assignment.category.as_str(),
                order.as_str(),
            ])
            .map_err(|e| OutputError::csv(&path, e))?;
    }
    finish_csv(writer, &path)
}

/// Write the run summary as pretty-printed JSON.
pub fn write_run_summary(output_dir: &Path, summary: &RunSummary) -> Result<PathBuf> {
    ensure_output_dir(output_dir)?;
    let path = output_dir.join(RUN_SUMMARY_FILE);
    let json = serde_json::to_string_pretty(summary).map_err(|source| OutputError::Json {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, format!("{json}\n")).map_err(|e| OutputError::io(&path, e))?;
    Ok(path)
}

/// Write the merged `PROCEDURE,Amount,Key_FS,Source` fee schedule.
pub fn write_fee_schedule(output_dir: &Path, schedule: &DataFrame) -> Result<PathBuf> {
    ensure_output_dir(output_dir)?;
    write_frame_csv(schedule, &output_dir.join(FEE_SCHEDULE_FILE))
}
