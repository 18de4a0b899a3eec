//! Source-tagged record batches.
//!
//! Every input file becomes a [`SourceFrame`] tagged with the source it came
//! from. Frames are unioned into one batch for normalization and split back
//! apart by their tag for output.

use std::path::PathBuf;

use polars::prelude::{AnyValue, BooleanChunked, Column, DataFrame, DataType, NewChunkedArray};

use medmap_common::any_to_string;

use crate::data_utils::require_column;
use crate::error::TransformError;

/// Provenance of a source frame.
#[derive(Debug, Clone, Default)]
pub struct SourceFrameMeta {
    /// The files whose rows make up this frame.
    pub source_files: Vec<PathBuf>,
}

/// Records from one origin, with the tag used to route them to output.
#[derive(Debug, Clone)]
pub struct SourceFrame {
    /// Origin tag (e.g. the directory an export was found in).
    pub source: String,
    /// The records themselves.
    pub data: DataFrame,
    /// Optional provenance metadata.
    pub meta: Option<SourceFrameMeta>,
}

impl SourceFrame {
    pub fn new(source: impl Into<String>, data: DataFrame) -> Self {
        Self {
            source: source.into(),
            data,
            meta: None,
        }
    }

    /// Returns the number of records in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    pub fn source_files(&self) -> &[PathBuf] {
        self.meta
            .as_ref()
            .map(|m| m.source_files.as_slice())
            .unwrap_or(&[])
    }

    pub fn add_source_file(&mut self, path: PathBuf) {
        let meta = self.meta.get_or_insert_with(SourceFrameMeta::default);
        meta.source_files.push(path);
    }
}

/// Union source frames into one batch with a tag column.
///
/// Columns are matched by name. A column missing from one frame is filled with
/// nulls for that frame's rows, every column becomes text, and the tag column
/// is written (or overwritten) from [`SourceFrame::source`]. Column order is
/// first appearance across the frames, with the tag column last.
pub fn combine_source_frames(
    frames: &[SourceFrame],
    source_column: &str,
) -> Result<DataFrame, TransformError> {
    let mut names: Vec<String> = Vec::new();
    for frame in frames {
        for name in frame.data.get_column_names() {
            if name.as_str() != source_column && !names.iter().any(|n| n == name.as_str()) {
                names.push(name.to_string());
            }
        }
    }

    let mut combined: Option<DataFrame> = None;
    for frame in frames {
        let height = frame.data.height();
        let mut columns = Vec::with_capacity(names.len() + 1);
        for name in &names {
            let column = match frame.data.column(name) {
                Ok(column) => column.cast(&DataType::String)?,
                Err(_) => Column::full_null(name.as_str().into(), height, &DataType::String),
            };
            columns.push(column);
        }
        columns.push(Column::new(
            source_column.into(),
            vec![frame.source.as_str(); height],
        ));
        let aligned = DataFrame::new(columns)?;
        match combined.as_mut() {
            Some(df) => {
                df.vstack_mut(&aligned)?;
            }
            None => combined = Some(aligned),
        }
    }
    Ok(combined.unwrap_or_else(DataFrame::empty))
}

/// Remove rows in which every cell is null.
///
/// A cell holding only whitespace is a value, so such rows are kept.
pub fn drop_empty_rows(df: &DataFrame) -> Result<DataFrame, TransformError> {
    let columns = df.get_columns();
    let mask: Vec<bool> = (0..df.height())
        .map(|idx| {
            columns
                .iter()
                .any(|column| !matches!(column.get(idx), Ok(AnyValue::Null) | Err(_)))
        })
        .collect();
    if mask.iter().all(|keep| *keep) {
        return Ok(df.clone());
    }
    let mask = BooleanChunked::from_slice("keep".into(), &mask);
    Ok(df.filter(&mask)?)
}

/// Split a combined batch back into one frame per tag.
///
/// Frames come back in order of each tag's first row and keep the tag column,
/// so every output partition still says where its rows came from.
pub fn split_by_source(
    df: &DataFrame,
    source_column: &str,
) -> Result<Vec<SourceFrame>, TransformError> {
    let column = require_column(df, source_column)?;
    let tags: Vec<String> = (0..df.height())
        .map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect();

    let mut order: Vec<&str> = Vec::new();
    for tag in &tags {
        if !order.contains(&tag.as_str()) {
            order.push(tag.as_str());
        }
    }

    let mut frames = Vec::with_capacity(order.len());
    for source in order {
        let mask: Vec<bool> = tags.iter().map(|tag| tag == source).collect();
        let mask = BooleanChunked::from_slice("keep".into(), &mask);
        frames.push(SourceFrame::new(source, df.filter(&mask)?));
    }
    Ok(frames)
}
