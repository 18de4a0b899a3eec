//! DataFrame access helpers shared by the batch stages.

use polars::prelude::{AnyValue, Column, DataFrame};

use medmap_common::{any_to_string, any_to_text};
use medmap_model::ColumnLayout;

use crate::error::TransformError;

/// Look up a configured column, reporting a missing one as a transform error.
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, TransformError> {
    df.column(name).map_err(|_| TransformError::ColumnNotFound {
        column: name.to_string(),
    })
}

/// Cell values of a column as text, with nulls coerced to the missing-value
/// literal.
pub fn column_text_values(column: &Column) -> Vec<String> {
    (0..column.len())
        .map(|idx| any_to_text(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

/// Cell values of a column, `None` for nulls.
pub fn column_optional_values(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|idx| match column.get(idx).unwrap_or(AnyValue::Null) {
            AnyValue::Null => None,
            value => Some(any_to_string(value)),
        })
        .collect()
}

/// Names of every diagnosis column in frame order.
pub fn diagnosis_columns(df: &DataFrame, layout: &ColumnLayout) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .filter(|name| layout.is_diagnosis_column(name.as_str()))
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    #[test]
    fn diagnosis_columns_follow_prefix() {
        let df = df! {
            "Diagnosis 1" => ["Flu"],
            "Procedure Code" => ["99213"],
            "diagnosis 2" => ["Cough"],
        }
        .unwrap();
        let names = diagnosis_columns(&df, &ColumnLayout::default());
        assert_eq!(names, vec!["Diagnosis 1", "diagnosis 2"]);
    }

    #[test]
    fn missing_column_is_reported() {
        let df = df! { "A" => ["x"] }.unwrap();
        let err = require_column(&df, "Insurance Name Plan1").unwrap_err();
        assert!(matches!(err, TransformError::ColumnNotFound { column } if column == "Insurance Name Plan1"));
    }

    #[test]
    fn text_values_coerce_nulls() {
        let column = Column::new("Plan".into(), [Some("Aetna"), None]);
        assert_eq!(column_text_values(&column), vec!["Aetna", "nan"]);
        assert_eq!(
            column_optional_values(&column),
            vec![Some("Aetna".to_string()), None]
        );
    }
}
