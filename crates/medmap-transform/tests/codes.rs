//! Tests for code extraction, conflict detection and category assignment.

use medmap_model::{CategoryOptions, CategoryWhitelist, ExtractedCode, OTHERS_CATEGORY};
use medmap_transform::{
    assign_categories, detect_conflicts, extract_code, extract_codes, group_codes,
};

#[test]
fn extract_takes_first_bracket_pair() {
    assert_eq!(extract_code("Flu [J11] and [J10]").as_deref(), Some("J11"));
    assert_eq!(extract_code("Essential hypertension [I10]").as_deref(), Some("I10"));
}

#[test]
fn extract_without_closed_pair_is_absent() {
    assert_eq!(extract_code("Hypertension"), None);
    assert_eq!(extract_code("Open [I10"), None);
    assert_eq!(extract_code("Closed I10]"), None);
}

#[test]
fn extract_keeps_codes_unvalidated() {
    assert_eq!(extract_code("Odd [ x y ]").as_deref(), Some(" x y "));
    assert_eq!(extract_code("Empty []").as_deref(), Some(""));
}

#[test]
fn conflicts_match_worked_example() {
    let codes = extract_codes(["Flu [J11]", "Influenza [J11]", "Cold [J00]", "Hypertension"]);
    assert_eq!(codes[3], ExtractedCode::new("Hypertension", None));

    let report = detect_conflicts(&codes);
    assert_eq!(report.code_count(), 1);
    let rows: Vec<(&str, &str)> = report.rows().collect();
    assert_eq!(rows, vec![("J11", "Flu [J11]"), ("J11", "Influenza [J11]")]);
}

#[test]
fn conflicts_keep_only_codes_with_several_descriptions() {
    let codes = vec![
        ExtractedCode::new("Flu", Some("A1".to_string())),
        ExtractedCode::new("Cold", Some("A1".to_string())),
        ExtractedCode::new("Cough", Some("B2".to_string())),
    ];
    let report = detect_conflicts(&codes);
    assert_eq!(report.code_count(), 1);
    assert_eq!(report.groups[0].code, "A1");
    let descriptions: Vec<&str> = report.groups[0]
        .descriptions
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(descriptions, vec!["Cold", "Flu"]);
}

#[test]
fn repeated_description_is_not_a_conflict() {
    let codes = extract_codes(["Cold [J00]", "Cold [J00]", "Cold [J00]"]);
    assert!(detect_conflicts(&codes).is_empty());

    let groups = group_codes(&codes);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].descriptions.len(), 1);
}

#[test]
fn conflict_groups_are_sorted_by_code() {
    let codes = extract_codes([
        "Zeta [Z1]",
        "Alpha [A1]",
        "Zed [Z1]",
        "Alpha one [A1]",
    ]);
    let report = detect_conflicts(&codes);
    let codes: Vec<&str> = report.groups.iter().map(|g| g.code.as_str()).collect();
    assert_eq!(codes, vec!["A1", "Z1"]);
    assert_eq!(report.row_count(), 4);
}

#[test]
fn categories_match_worked_example() {
    let whitelist = CategoryWhitelist::parse("X,Y,Z").unwrap();
    let table = assign_categories(&whitelist, ["Z", "Q", "X", "R"], CategoryOptions::default());

    let rows: Vec<(&str, &str, u32)> = table
        .iter()
        .map(|a| (a.code.as_str(), a.category.as_str(), a.order))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("X", "X", 1),
            ("Z", "Z", 2),
            ("Q", OTHERS_CATEGORY, 3),
            ("R", OTHERS_CATEGORY, 3),
        ]
    );
}

#[test]
fn categories_can_list_unobserved_whitelist_codes() {
    let whitelist = CategoryWhitelist::parse("X,Y,Z").unwrap();
    let options = CategoryOptions {
        include_unobserved_whitelist: true,
    };
    let table = assign_categories(&whitelist, ["Z", "Q"], options);
    let rows: Vec<(&str, u32)> = table.iter().map(|a| (a.code.as_str(), a.order)).collect();
    assert_eq!(rows, vec![("X", 1), ("Y", 2), ("Z", 3), ("Q", 4)]);
}

#[test]
fn categories_ignore_blanks_and_repeats() {
    let whitelist = CategoryWhitelist::parse("99213").unwrap();
    let table = assign_categories(
        &whitelist,
        [" 99213 ", "", "99213", "J1100", "J1100 "],
        CategoryOptions::default(),
    );
    assert_eq!(table.len(), 2);
    assert!(!table[0].is_others());
    assert!(table[1].is_others());
    assert_eq!(table[1].code, "J1100");
}

#[test]
fn categories_without_whitelisted_codes_start_others_at_one() {
    let whitelist = CategoryWhitelist::default();
    let table = assign_categories(&whitelist, ["J1100", "36415"], CategoryOptions::default());
    assert!(table.iter().all(|a| a.is_others() && a.order == 1));
}

#[test]
fn whitelist_sort_is_lexicographic() {
    let whitelist = CategoryWhitelist::parse("9,10,100").unwrap();
    let table = assign_categories(&whitelist, ["9", "100", "10"], CategoryOptions::default());
    let codes: Vec<&str> = table.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, vec!["10", "100", "9"]);
}
