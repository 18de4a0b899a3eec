//! Applying the rule tables to a whole record batch.

use polars::prelude::{Column, DataFrame};
use tracing::debug;

use medmap_model::{ColumnLayout, ExtractedCode, NormalizationTables};

use crate::data_utils::{
    column_optional_values, column_text_values, diagnosis_columns, require_column,
};
use crate::error::TransformError;
use crate::extract::extract_code;
use crate::normalization::{apply_exact_map, apply_substitutions};

/// What normalization changed in one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationStats {
    pub records: usize,
    /// Insurance values that differ from their text form after substitution.
    pub insurance_changed: usize,
    /// Non-null diagnosis values that differ after exact mapping.
    pub diagnosis_changed: usize,
    /// Diagnosis columns recognized by prefix, in frame order.
    pub diagnosis_columns: Vec<String>,
}

/// A normalized batch and what changed in it.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub data: DataFrame,
    pub stats: NormalizationStats,
}

/// Normalize the insurance column and every diagnosis column of a batch.
///
/// The insurance column is coerced to text (nulls become the missing-value
/// literal) and run through the substitution rules. Each diagnosis column is
/// run through the exact map cell by cell; nulls stay null. Other columns are
/// untouched. Every row is independent of every other row, so splitting a
/// batch, normalizing the parts and recombining them gives the same result.
pub fn normalize_batch(
    df: &DataFrame,
    tables: &NormalizationTables,
    layout: &ColumnLayout,
) -> Result<NormalizedBatch, TransformError> {
    let mut data = df.clone();
    let mut stats = NormalizationStats {
        records: df.height(),
        ..NormalizationStats::default()
    };

    let insurance = require_column(df, &layout.insurance_plan)?;
    let before = column_text_values(insurance);
    let after: Vec<String> = before
        .iter()
        .map(|value| apply_substitutions(value, &tables.substitutions))
        .collect();
    stats.insurance_changed = before
        .iter()
        .zip(&after)
        .filter(|(old, new)| old != new)
        .count();
    data.with_column(Column::new(layout.insurance_plan.as_str().into(), after))?;

    for name in diagnosis_columns(df, layout) {
        let column = require_column(df, &name)?;
        let before = column_optional_values(column);
        let mut changed = 0usize;
        let after: Vec<Option<String>> = before
            .into_iter()
            .map(|value| {
                value.map(|text| {
                    let mapped = apply_exact_map(&text, &tables.exact_map);
                    if mapped != text {
                        changed += 1;
                    }
                    mapped
                })
            })
            .collect();
        debug!(column = %name, changed, "diagnosis column mapped");
        stats.diagnosis_changed += changed;
        data.with_column(Column::new(name.as_str().into(), after))?;
        stats.diagnosis_columns.push(name);
    }

    Ok(NormalizedBatch { data, stats })
}

/// Flatten every non-blank diagnosis value of a batch and extract its code.
///
/// Values are taken column by column in frame order.
pub fn collect_diagnosis_codes(df: &DataFrame, layout: &ColumnLayout) -> Vec<ExtractedCode> {
    let mut extracted = Vec::new();
    for name in diagnosis_columns(df, layout) {
        let Ok(column) = df.column(&name) else {
            continue;
        };
        for text in column_optional_values(column).into_iter().flatten() {
            if text.trim().is_empty() {
                continue;
            }
            let code = extract_code(&text);
            extracted.push(ExtractedCode {
                raw_text: text,
                code,
            });
        }
    }
    extracted
}

/// Non-blank procedure-code values of a batch, trimmed, in row order.
pub fn observed_procedure_codes(
    df: &DataFrame,
    layout: &ColumnLayout,
) -> Result<Vec<String>, TransformError> {
    let column = require_column(df, &layout.procedure_code)?;
    Ok(column_optional_values(column)
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect())
}
