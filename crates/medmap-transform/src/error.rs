use polars::prelude::PolarsError;
use thiserror::Error;

/// Structural failures while applying rules to a record batch.
///
/// Values that match no rule are never errors; only a batch that lacks a
/// configured field or a failing frame operation ends up here.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("column '{column}' not found in record batch")]
    ColumnNotFound { column: String },

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}
