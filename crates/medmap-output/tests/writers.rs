//! Tests for output writers.

use std::fs;
use std::path::PathBuf;

use medmap_model::{CategoryAssignment, ConflictReport, RunSummary, SourceSummary};
use medmap_output::{
    CATEGORY_TABLE_FILE, CONFLICT_REPORT_FILE, FEE_SCHEDULE_FILE, OutputError,
    write_category_table, write_conflict_report, write_fee_schedule, write_run_summary,
    write_source_partitions,
};
use medmap_transform::{SourceFrame, detect_conflicts, extract_codes};
use polars::prelude::*;

#[test]
fn conflict_report_lists_each_description() {
    let dir = tempfile::tempdir().unwrap();
    let report = detect_conflicts(&extract_codes([
        "Flu [J11]",
        "Influenza [J11]",
        "Cold [J00]",
        "Hypertension",
    ]));
    let path = write_conflict_report(dir.path(), &report).unwrap();
    assert_eq!(path, dir.path().join(CONFLICT_REPORT_FILE));

    let contents = fs::read_to_string(path).unwrap();
    insta::assert_snapshot!(contents.trim_end(), @r"
    Code,Description
    J11,Flu [J11]
    J11,Influenza [J11]
    ");
}

#[test]
fn empty_conflict_report_has_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_conflict_report(dir.path(), &ConflictReport::default()).unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "Code,Description\n");
}

#[test]
fn category_table_keeps_assignment_order() {
    let dir = tempfile::tempdir().unwrap();
    let rows = [("X", "X", 1), ("Z", "Z", 2), ("Q", "Others", 3), ("R", "Others", 3)]
        .map(|(code, category, order)| CategoryAssignment {
            code: code.to_string(),
            category: category.to_string(),
            order,
        });
    let path = write_category_table(dir.path(), &rows).unwrap();
    assert_eq!(path, dir.path().join(CATEGORY_TABLE_FILE));

    let contents = fs::read_to_string(path).unwrap();
    insta::assert_snapshot!(contents.trim_end(), @r"
    Code,Category,Order
    X,X,1
    Z,Z,2
    Q,Others,3
    R,Others,3
    ");
}

#[test]
fn partitions_are_written_per_source() {
    let dir = tempfile::tempdir().unwrap();
    let mut clinic_a = SourceFrame::new(
        "clinic_a",
        df! {
            "Insurance Name Plan1" => ["Aetna"],
            "Diagnosis 1" => [Some("Flu, acute [J11]")],
            "Source" => ["clinic_a"],
        }
        .unwrap(),
    );
    clinic_a.add_source_file(PathBuf::from("exports/clinic_a/visits.csv"));
    let frames = vec![
        clinic_a,
        SourceFrame::new(
            "clinic_b",
            df! {
                "Insurance Name Plan1" => ["nan"],
                "Diagnosis 1" => [None::<&str>],
                "Source" => ["clinic_b"],
            }
            .unwrap(),
        ),
    ];
    let summaries = write_source_partitions(dir.path(), &frames).unwrap();
    assert_eq!(
        summaries,
        vec![
            SourceSummary {
                source: "clinic_a".to_string(),
                records: 1,
                inputs: vec![PathBuf::from("exports/clinic_a/visits.csv")],
                output: Some(dir.path().join("clinic_a.csv")),
            },
            SourceSummary {
                source: "clinic_b".to_string(),
                records: 1,
                inputs: Vec::new(),
                output: Some(dir.path().join("clinic_b.csv")),
            },
        ]
    );

    let first = fs::read_to_string(dir.path().join("clinic_a.csv")).unwrap();
    assert_eq!(
        first,
        "Insurance Name Plan1,Diagnosis 1,Source\nAetna,\"Flu, acute [J11]\",clinic_a\n"
    );
    let second = fs::read_to_string(dir.path().join("clinic_b.csv")).unwrap();
    assert_eq!(second, "Insurance Name Plan1,Diagnosis 1,Source\nnan,,clinic_b\n");
}

#[test]
fn colliding_partition_names_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output");
    let frames = vec![
        SourceFrame::new("a:b", df! { "X" => ["first"] }.unwrap()),
        SourceFrame::new("a?b", df! { "X" => ["second"] }.unwrap()),
    ];
    let err = write_source_partitions(&out, &frames).unwrap_err();
    match err {
        OutputError::PartitionCollision {
            file_name,
            first,
            second,
        } => {
            assert_eq!(file_name, "a_b.csv");
            assert_eq!(first, "a:b");
            assert_eq!(second, "a?b");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out.exists());
}

#[test]
fn partition_names_collide_case_insensitively_and_with_reports() {
    let dir = tempfile::tempdir().unwrap();
    let frames = vec![
        SourceFrame::new("Clinic", df! { "X" => ["a"] }.unwrap()),
        SourceFrame::new("clinic", df! { "X" => ["b"] }.unwrap()),
    ];
    assert!(matches!(
        write_source_partitions(dir.path(), &frames),
        Err(OutputError::PartitionCollision { .. })
    ));

    let frames = vec![SourceFrame::new(
        "duplicate_codes",
        df! { "X" => ["a"] }.unwrap(),
    )];
    assert!(matches!(
        write_source_partitions(dir.path(), &frames),
        Err(OutputError::PartitionCollision { .. })
    ));
}

#[test]
fn fee_schedule_is_written_as_csv() {
    let dir = tempfile::tempdir().unwrap();
    let schedule = df! {
        "PROCEDURE" => ["99213", "90471"],
        "Amount" => ["75.10", "20.00"],
        "Key_FS" => ["9921326", "90471"],
        "Source" => ["Medicare FL", "VACCN"],
    }
    .unwrap();
    let path = write_fee_schedule(dir.path(), &schedule).unwrap();
    assert_eq!(path, dir.path().join(FEE_SCHEDULE_FILE));

    let contents = fs::read_to_string(path).unwrap();
    insta::assert_snapshot!(contents.trim_end(), @r"
    PROCEDURE,Amount,Key_FS,Source
    99213,75.10,9921326,Medicare FL
    90471,20.00,90471,VACCN
    ");
}

#[test]
fn run_summary_is_json() {
    let dir = tempfile::tempdir().unwrap();
    let summary = RunSummary {
        generated_at: "2026-01-01T00:00:00+00:00".to_string(),
        total_records: 4,
        ambiguous_codes: 1,
        diagnosis_columns: vec!["Diagnosis 1".to_string()],
        ..RunSummary::default()
    };
    let path = write_run_summary(dir.path(), &summary).unwrap();
    let parsed: RunSummary = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(parsed, summary);
}
