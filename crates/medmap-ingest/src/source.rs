//! Reading billing export tables.

use std::path::{Path, PathBuf};

use polars::prelude::*;

use medmap_common::collapse_whitespace;

use crate::error::{IngestError, Result};

/// An input file and the source tag its rows receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub source: String,
}

impl SourceFile {
    /// Tag a file with [`source_tag`].
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source = source_tag(&path);
        Self { path, source }
    }
}

/// Source tag for a file: the name of the directory it sits in.
///
/// Exports are laid out one directory per clinic, so the directory name is
/// what identifies the clinic. A file with no named parent falls back to its
/// own stem.
pub fn source_tag(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .or_else(|| path.file_stem())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read a CSV export with every column as text.
///
/// No type inference is done: codes such as `00123` or `99213` must survive
/// as written.
pub fn read_source_table(path: &Path) -> Result<DataFrame> {
    read_text_table(path, 0)
}

/// Read a payer fee schedule, skipping `skip_rows` preamble lines above the
/// header.
pub fn read_fee_schedule_table(path: &Path, skip_rows: usize) -> Result<DataFrame> {
    read_text_table(path, skip_rows)
}

fn read_text_table(path: &Path, skip_rows: usize) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_skip_rows(skip_rows)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let df = normalize_headers(df)?;

    tracing::debug!(
        path = %path.display(),
        skip_rows,
        rows = df.height(),
        columns = df.width(),
        "read text table"
    );
    Ok(df)
}

/// Collapse padded or wrapped header names so configured column names match.
fn normalize_headers(mut df: DataFrame) -> Result<DataFrame> {
    let renames: Vec<(String, String)> = df
        .get_column_names()
        .into_iter()
        .filter_map(|name| {
            let collapsed = collapse_whitespace(name.as_str());
            (collapsed != name.as_str()).then(|| (name.to_string(), collapsed))
        })
        .collect();
    for (old, new) in renames {
        df.rename(&old, new.into())?;
    }
    Ok(df)
}
