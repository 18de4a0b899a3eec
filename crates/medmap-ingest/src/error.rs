//! Error types for loading source and rule tables.

use std::path::PathBuf;

use medmap_model::ModelError;
use thiserror::Error;

/// Errors that can occur while loading inputs.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse a source table with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Required header not found in a rule table.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === Rule Errors ===
    /// A rule table row could not be turned into a rule.
    #[error("invalid rule on line {line} of {path}: {source}")]
    InvalidRule {
        path: PathBuf,
        line: u64,
        #[source]
        source: ModelError,
    },

    /// Whitelist in the run configuration is not usable.
    #[error("invalid category whitelist in {path}: {source}")]
    InvalidWhitelist {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    // === Configuration Errors ===
    /// A fee schedule entry in the run configuration is incomplete.
    #[error("invalid fee schedule '{source_tag}' in {path}: {message}")]
    InvalidFeeSchedule {
        path: PathBuf,
        source_tag: String,
        message: String,
    },

    /// Failed to parse the TOML run configuration.
    #[error("failed to parse TOML configuration {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileRead { path, source }
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, err: &csv::Error) -> Self {
        Self::CsvParse {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
