use medmap_model::{
    CategoryAssignment, CategoryWhitelist, ColumnLayout, ConflictGroup, ConflictReport,
    DEFAULT_CATEGORY_WHITELIST, ExactMapEntry, ExactMapTable, FeeScheduleSource, ModelError,
    RowFilter, RunSummary, SubstitutionRule, SubstitutionTable,
};

#[test]
fn substitution_rule_lowercases_pattern() {
    let rule = SubstitutionRule::new("BlueCross", "Blue Cross Blue Shield").unwrap();
    assert_eq!(rule.pattern, "bluecross");
    assert_eq!(rule.replacement, "Blue Cross Blue Shield");
}

#[test]
fn substitution_rule_rejects_empty_pattern() {
    let err = SubstitutionRule::new("", "Anything").unwrap_err();
    assert_eq!(
        err,
        ModelError::EmptyPattern {
            replacement: "Anything".to_string()
        }
    );
}

#[test]
fn substitution_table_keeps_order() {
    let table = SubstitutionTable::from_pairs([("a", "X"), ("x", "Y")]).unwrap();
    let patterns: Vec<&str> = table.rules().iter().map(|r| r.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["a", "x"]);
    assert_eq!(table.len(), 2);
}

#[test]
fn exact_map_entry_normalizes_source_only() {
    let entry = ExactMapEntry::new("  acute BRONCHITIS ", "J20.9 Acute bronchitis").unwrap();
    assert_eq!(entry.source, "Acute Bronchitis");
    assert_eq!(entry.destination, "J20.9 Acute bronchitis");
    assert!(!entry.destination_is_normalized());

    let normalized = ExactMapEntry::new("flu", "Influenza [J11]").unwrap();
    assert!(normalized.destination_is_normalized());
}

#[test]
fn exact_map_entry_rejects_blank_source() {
    assert!(matches!(
        ExactMapEntry::new("   ", "X"),
        Err(ModelError::EmptySource { .. })
    ));
}

#[test]
fn exact_map_reports_duplicate_sources() {
    let table =
        ExactMapTable::from_pairs([("flu", "A"), ("FLU", "B"), ("cold", "C"), ("Flu", "D")])
            .unwrap();
    assert_eq!(table.duplicate_sources(), vec!["Flu"]);
}

#[test]
fn whitelist_parses_comma_separated_codes() {
    let whitelist = CategoryWhitelist::parse(" X, Y ,,Z,X ").unwrap();
    assert_eq!(whitelist.codes(), &["X", "Y", "Z"]);
    assert!(whitelist.contains("Y"));
    assert!(!whitelist.contains("Q"));
}

#[test]
fn whitelist_rejects_fallback_label() {
    assert_eq!(
        CategoryWhitelist::parse("X,Others"),
        Err(ModelError::ReservedCategory("Others".to_string()))
    );
}

#[test]
fn default_whitelist_matches_constant() {
    let whitelist = CategoryWhitelist::default();
    let parsed = CategoryWhitelist::parse(DEFAULT_CATEGORY_WHITELIST).unwrap();
    assert_eq!(whitelist, parsed);
    assert!(whitelist.contains("99213"));
}

#[test]
fn conflict_report_rows_flatten_groups() {
    let report = ConflictReport {
        groups: vec![ConflictGroup {
            code: "A1".to_string(),
            descriptions: ["Flu [A1]", "Cold [A1]"]
                .into_iter()
                .map(String::from)
                .collect(),
        }],
    };
    let rows: Vec<(&str, &str)> = report.rows().collect();
    assert_eq!(rows, vec![("A1", "Cold [A1]"), ("A1", "Flu [A1]")]);
    assert_eq!(report.row_count(), 2);
    assert_eq!(report.code_count(), 1);
    assert!(report.groups[0].is_ambiguous());
}

#[test]
fn category_assignment_detects_fallback() {
    let others = CategoryAssignment {
        code: "Q".to_string(),
        category: "Others".to_string(),
        order: 3,
    };
    assert!(others.is_others());
}

#[test]
fn layout_matches_diagnosis_prefix_case_insensitively() {
    let layout = ColumnLayout::default();
    assert!(layout.is_diagnosis_column("Diagnosis 1"));
    assert!(layout.is_diagnosis_column("DIAGNOSIS2"));
    assert!(!layout.is_diagnosis_column("Insurance Name Plan1"));
    assert!(!layout.is_diagnosis_column("Diag"));
}

#[test]
fn run_summary_serializes() {
    let summary = RunSummary {
        generated_at: "2026-01-01T00:00:00Z".to_string(),
        total_records: 3,
        ambiguous_codes: 1,
        ..RunSummary::default()
    };
    let json = serde_json::to_string(&summary).expect("serialize summary");
    let round: RunSummary = serde_json::from_str(&json).expect("deserialize summary");
    assert_eq!(round, summary);
    assert!(round.has_ambiguous_codes());
}

#[test]
fn fee_key_skips_missing_modifiers() {
    let schedule = FeeScheduleSource::new("Medicare FL", "medicare.csv", "PROCEDURE", "PAR  AMOUNT");
    assert_eq!(schedule.key("99213", Some("26")), "9921326");
    assert_eq!(schedule.key("99213", Some("nan")), "99213");
    assert_eq!(schedule.key("99213", Some("N/A")), "99213");
    assert_eq!(schedule.key("99213", Some("  ")), "99213");
    assert_eq!(schedule.key("99213", None), "99213");
}

#[test]
fn fee_key_markers_are_configurable() {
    let mut schedule = FeeScheduleSource::new("Capital", "capital.csv", "PROCEDURE", "PAR  AMOUNT");
    schedule.missing_modifiers = vec!["nan".to_string()];
    assert_eq!(schedule.key("99213", Some("N/A")), "99213N/A");
    assert_eq!(schedule.key("99213", Some("nan")), "99213");
}

#[test]
fn row_filters_treat_blank_as_null() {
    let network = RowFilter::IsNull {
        column: "Customer/Network Name".to_string(),
    };
    assert!(network.keeps(None));
    assert!(network.keeps(Some(" ")));
    assert!(!network.keeps(Some("Open Access")));

    let locality = RowFilter::Equals {
        column: "Locality Description".to_string(),
        value: "REST OF FLORIDA".to_string(),
    };
    assert!(locality.keeps(Some("REST OF FLORIDA")));
    assert!(!locality.keeps(Some("MIAMI")));
    assert!(!locality.keeps(None));

    let procedure = RowFilter::NotNull {
        column: "PROCEDURE".to_string(),
    };
    assert_eq!(procedure.column(), "PROCEDURE");
    assert!(!procedure.keeps(None));
}
