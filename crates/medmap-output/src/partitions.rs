//! Writing normalized records, one CSV per source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use polars::prelude::{AnyValue, DataFrame};

use medmap_common::any_to_string;
use medmap_model::SourceSummary;
use medmap_transform::SourceFrame;

use crate::common::{
    REPORT_FILES, ensure_output_dir, finish_csv, open_csv, partition_file_name,
};
use crate::error::{OutputError, Result};

/// Write a frame as CSV with a header row. Nulls are written as empty fields.
pub fn write_frame_csv(df: &DataFrame, path: &Path) -> Result<PathBuf> {
    let mut writer = open_csv(path)?;
    let header: Vec<&str> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();
    writer
        .write_record(&header)
        .map_err(|e| OutputError::csv(path, e))?;

    let columns = df.get_columns();
    let mut record: Vec<String> = Vec::with_capacity(columns.len());
    for idx in 0..df.height() {
        record.clear();
        for column in columns {
            record.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
        }
        writer
            .write_record(&record)
            .map_err(|e| OutputError::csv(path, e))?;
    }
    finish_csv(writer, path)
}

/// Assign every frame its partition file name.
///
/// File names are compared case-insensitively. Two tags that map to the same
/// file, or a tag that maps onto a report file, is an error.
pub fn partition_file_names(frames: &[SourceFrame]) -> Result<Vec<String>> {
    let mut taken: HashMap<String, &str> = REPORT_FILES
        .iter()
        .map(|name| (name.to_lowercase(), *name))
        .collect();
    let mut names = Vec::with_capacity(frames.len());
    for frame in frames {
        let file_name = partition_file_name(&frame.source);
        if let Some(first) = taken.insert(file_name.to_lowercase(), frame.source.as_str()) {
            return Err(OutputError::PartitionCollision {
                file_name,
                first: first.to_string(),
                second: frame.source.clone(),
            });
        }
        names.push(file_name);
    }
    Ok(names)
}

/// Write every source frame to `<output_dir>/<source>.csv`.
///
/// All file names are checked before anything is written. Returns one summary
/// per frame, in the order given.
pub fn write_source_partitions(
    output_dir: &Path,
    frames: &[SourceFrame],
) -> Result<Vec<SourceSummary>> {
    let names = partition_file_names(frames)?;
    ensure_output_dir(output_dir)?;
    let mut summaries = Vec::with_capacity(frames.len());
    for (frame, file_name) in frames.iter().zip(names) {
        let path = output_dir.join(file_name);
        let written = write_frame_csv(&frame.data, &path)?;
        tracing::debug!(
            source = %frame.source,
            records = frame.record_count(),
            path = %written.display(),
            "wrote source partition"
        );
        summaries.push(SourceSummary {
            source: frame.source.clone(),
            records: frame.record_count(),
            inputs: frame.source_files().to_vec(),
            output: Some(written),
        });
    }
    Ok(summaries)
}
