//! Tests for batch normalization and source frames.

use medmap_common::any_to_string;
use medmap_model::{
    CategoryWhitelist, ColumnLayout, ExactMapTable, NormalizationTables, SubstitutionTable,
};
use medmap_transform::{
    SourceFrame, TransformError, collect_diagnosis_codes, combine_source_frames,
    detect_conflicts, drop_empty_rows, normalize_batch, observed_procedure_codes,
    split_by_source,
};
use polars::prelude::*;
use proptest::prelude::*;

fn tables() -> NormalizationTables {
    NormalizationTables::new(
        SubstitutionTable::from_pairs([("aetna", "Aetna"), ("medicare", "Medicare")]).unwrap(),
        ExactMapTable::from_pairs([("flu", "Influenza [J11]"), ("cold", "Cold [J00]")]).unwrap(),
        CategoryWhitelist::default(),
    )
}

fn column_strings(df: &DataFrame, name: &str) -> Vec<String> {
    let column = df.column(name).unwrap();
    (0..df.height())
        .map(|idx| any_to_string(column.get(idx).unwrap()))
        .collect()
}

fn sample_batch() -> DataFrame {
    df! {
        "Insurance Name Plan1" => [Some("AETNA PPO"), None, Some("Self Pay")],
        "Diagnosis 1" => [Some("flu"), Some("Flu [J11]"), None],
        "Diagnosis 2" => [Some(" COLD "), None, Some("asthma")],
        "Procedure Code" => ["99213", "J1100", "99213"],
    }
    .unwrap()
}

#[test]
fn normalize_rewrites_configured_columns() {
    let normalized =
        normalize_batch(&sample_batch(), &tables(), &ColumnLayout::default()).unwrap();

    assert_eq!(
        column_strings(&normalized.data, "Insurance Name Plan1"),
        vec!["Aetna", "nan", "Self Pay"]
    );
    assert_eq!(
        column_strings(&normalized.data, "Diagnosis 1"),
        vec!["Influenza [J11]", "Flu [J11]", ""]
    );
    assert_eq!(
        column_strings(&normalized.data, "Diagnosis 2"),
        vec!["Cold [J00]", "", "Asthma"]
    );
    assert_eq!(
        column_strings(&normalized.data, "Procedure Code"),
        vec!["99213", "J1100", "99213"]
    );

    let stats = &normalized.stats;
    assert_eq!(stats.records, 3);
    assert_eq!(stats.insurance_changed, 1);
    assert_eq!(stats.diagnosis_changed, 3);
    assert_eq!(stats.diagnosis_columns, vec!["Diagnosis 1", "Diagnosis 2"]);
}

#[test]
fn diagnosis_nulls_stay_null() {
    let normalized =
        normalize_batch(&sample_batch(), &tables(), &ColumnLayout::default()).unwrap();
    let column = normalized.data.column("Diagnosis 1").unwrap();
    assert_eq!(column.null_count(), 1);
}

#[test]
fn missing_insurance_column_is_an_error() {
    let df = df! { "Diagnosis 1" => ["flu"] }.unwrap();
    let err = normalize_batch(&df, &tables(), &ColumnLayout::default()).unwrap_err();
    assert!(matches!(err, TransformError::ColumnNotFound { .. }));
}

#[test]
fn normalized_codes_feed_conflict_detection() {
    let layout = ColumnLayout::default();
    let normalized = normalize_batch(&sample_batch(), &tables(), &layout).unwrap();
    let codes = collect_diagnosis_codes(&normalized.data, &layout);
    assert_eq!(codes.len(), 4);

    let report = detect_conflicts(&codes);
    let rows: Vec<(&str, &str)> = report.rows().collect();
    assert_eq!(rows, vec![("J11", "Flu [J11]"), ("J11", "Influenza [J11]")]);

    let procedures = observed_procedure_codes(&normalized.data, &layout).unwrap();
    assert_eq!(procedures, vec!["99213", "J1100", "99213"]);
}

#[test]
fn normalize_is_idempotent() {
    let layout = ColumnLayout::default();
    let once = normalize_batch(&sample_batch(), &tables(), &layout).unwrap();
    let twice = normalize_batch(&once.data, &tables(), &layout).unwrap();
    assert!(once.data.equals_missing(&twice.data));
    assert_eq!(twice.stats.insurance_changed, 0);
    assert_eq!(twice.stats.diagnosis_changed, 0);
}

#[test]
fn combine_unions_columns_and_tags_rows() {
    let first = SourceFrame::new(
        "clinic_a",
        df! { "Insurance Name Plan1" => ["Aetna"], "Diagnosis 1" => ["Flu"] }.unwrap(),
    );
    let second = SourceFrame::new(
        "clinic_b",
        df! { "Insurance Name Plan1" => ["Medicare"], "Procedure Code" => [99213i64] }.unwrap(),
    );
    let combined = combine_source_frames(&[first, second], "Source").unwrap();

    let names: Vec<String> = combined
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["Insurance Name Plan1", "Diagnosis 1", "Procedure Code", "Source"]
    );
    assert_eq!(column_strings(&combined, "Source"), vec!["clinic_a", "clinic_b"]);
    assert_eq!(column_strings(&combined, "Procedure Code"), vec!["", "99213"]);
    assert_eq!(combined.column("Diagnosis 1").unwrap().null_count(), 1);
}

#[test]
fn split_returns_sources_in_first_appearance_order() {
    let df = df! {
        "Insurance Name Plan1" => ["a", "b", "c", "d"],
        "Source" => ["north", "south", "north", "east"],
    }
    .unwrap();
    let frames = split_by_source(&df, "Source").unwrap();
    let parts: Vec<(&str, usize)> = frames
        .iter()
        .map(|frame| (frame.source.as_str(), frame.record_count()))
        .collect();
    assert_eq!(parts, vec![("north", 2), ("south", 1), ("east", 1)]);
    assert_eq!(
        column_strings(&frames[0].data, "Insurance Name Plan1"),
        vec!["a", "c"]
    );
}

#[test]
fn only_all_null_rows_are_dropped() {
    let df = df! {
        "A" => [Some("x"), None, Some("  "), None],
        "B" => [None, None, Some(""), None],
    }
    .unwrap();
    let cleaned = drop_empty_rows(&df).unwrap();
    assert_eq!(cleaned.height(), 2);
    assert_eq!(column_strings(&cleaned, "A"), vec!["x", "  "]);
}

proptest! {
    #[test]
    fn normalization_is_independent_of_batching(
        plans in prop::collection::vec("(aetna|AETNA HMO|medicare|self pay|x)", 2..12),
        split in 1usize..11,
    ) {
        let split = split.min(plans.len() - 1);
        let diagnoses: Vec<&str> = plans
            .iter()
            .enumerate()
            .map(|(idx, _)| if idx % 2 == 0 { "flu" } else { "cold" })
            .collect();
        let df = DataFrame::new(vec![
            Column::new("Insurance Name Plan1".into(), plans.clone()),
            Column::new("Diagnosis 1".into(), diagnoses),
        ])
        .unwrap();
        let layout = ColumnLayout::default();
        let whole = normalize_batch(&df, &tables(), &layout).unwrap().data;

        let head = normalize_batch(&df.slice(0, split), &tables(), &layout).unwrap().data;
        let tail = normalize_batch(&df.slice(split as i64, plans.len()), &tables(), &layout)
            .unwrap()
            .data;
        let mut parts = head;
        parts.vstack_mut(&tail).unwrap();

        prop_assert!(whole.equals_missing(&parts));
    }
}
