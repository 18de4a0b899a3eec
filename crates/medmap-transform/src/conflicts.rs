//! Detection of codes reported with more than one description.

use std::collections::{BTreeMap, BTreeSet};

use medmap_model::{ConflictGroup, ConflictReport, ExtractedCode};

/// Group extracted codes by code, collecting each distinct description once.
///
/// Entries without a code are skipped. Groups come back sorted by code and
/// include unambiguous ones.
pub fn group_codes(codes: &[ExtractedCode]) -> Vec<ConflictGroup> {
    let mut grouped: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for entry in codes {
        let Some(code) = entry.code.as_deref() else {
            continue;
        };
        grouped
            .entry(code)
            .or_default()
            .insert(entry.raw_text.as_str());
    }
    grouped
        .into_iter()
        .map(|(code, descriptions)| ConflictGroup {
            code: code.to_string(),
            descriptions: descriptions.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

/// Keep only the codes seen with more than one distinct description.
///
/// Ambiguity is reported, never raised: the caller reviews the report and
/// fixes the mapping tables for the next run.
pub fn detect_conflicts(codes: &[ExtractedCode]) -> ConflictReport {
    let groups = group_codes(codes)
        .into_iter()
        .filter(ConflictGroup::is_ambiguous)
        .collect();
    ConflictReport { groups }
}
