//! Rule table loaders.
//!
//! Both tables are plain two-column CSV files. Row order is rule order, so rows
//! are kept exactly as written apart from fully empty ones.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::warn;

use medmap_model::{
    ExactMapEntry, ExactMapTable, ModelError, SubstitutionRule, SubstitutionTable,
};

use crate::error::{IngestError, Result};

/// Header of the substitution pattern column.
pub const PATTERN_HEADER: &str = "ReplaceLowerContains";
/// Header of the substitution replacement column.
pub const REPLACEMENT_HEADER: &str = "ReplaceTo";
/// Header of the exact-map source column.
pub const SOURCE_HEADER: &str = "Source";
/// Header of the exact-map destination column.
pub const DESTINATION_HEADER: &str = "Destination";

/// Non-empty rows of a two-column rule table as `(line, left, right)`.
fn read_rule_rows(path: &Path, left: &str, right: &str) -> Result<Vec<(u64, String, String)>> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let headers = reader
        .headers()
        .map_err(|e| IngestError::csv(path, &e))?
        .clone();
    if headers.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let left_idx = header_index(&headers, left, path)?;
    let right_idx = header_index(&headers, right, path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::csv(path, &e))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = record.position().map_or(0, csv::Position::line);
        let get = |idx: usize| record.get(idx).unwrap_or("").to_string();
        rows.push((line, get(left_idx), get(right_idx)));
    }
    Ok(rows)
}

fn header_index(headers: &StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_matches('\u{feff}').trim() == name)
        .ok_or_else(|| IngestError::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })
}

/// Load ordered substitution rules from a `ReplaceLowerContains,ReplaceTo` CSV.
///
/// Patterns are lowercased. A row with an empty pattern would match every
/// value, so it is skipped with a warning rather than loaded.
pub fn load_substitution_table(path: &Path) -> Result<SubstitutionTable> {
    let rows = read_rule_rows(path, PATTERN_HEADER, REPLACEMENT_HEADER)?;
    let mut rules = Vec::with_capacity(rows.len());
    for (line, pattern, replacement) in rows {
        match SubstitutionRule::new(&pattern, replacement) {
            Ok(rule) => rules.push(rule),
            Err(ModelError::EmptyPattern { replacement }) => {
                warn!(
                    path = %path.display(),
                    line,
                    replacement = %replacement,
                    "skipping substitution rule with empty pattern"
                );
            }
            Err(source) => {
                return Err(IngestError::InvalidRule {
                    path: path.to_path_buf(),
                    line,
                    source,
                });
            }
        }
    }
    tracing::debug!(path = %path.display(), rules = rules.len(), "loaded substitution rules");
    Ok(SubstitutionTable::new(rules))
}

/// Load exact-map entries from a `Source,Destination` CSV.
///
/// Sources are normalized on load; destinations are kept verbatim. Rows with
/// a blank source are skipped with a warning, and sources listed twice are
/// reported since only the first can ever match.
pub fn load_exact_map_table(path: &Path) -> Result<ExactMapTable> {
    let rows = read_rule_rows(path, SOURCE_HEADER, DESTINATION_HEADER)?;
    let mut entries = Vec::with_capacity(rows.len());
    for (line, source, destination) in rows {
        match ExactMapEntry::new(&source, destination) {
            Ok(entry) => entries.push(entry),
            Err(ModelError::EmptySource { destination }) => {
                warn!(
                    path = %path.display(),
                    line,
                    destination = %destination,
                    "skipping exact-map entry with empty source"
                );
            }
            Err(source) => {
                return Err(IngestError::InvalidRule {
                    path: path.to_path_buf(),
                    line,
                    source,
                });
            }
        }
    }
    let table = ExactMapTable::new(entries);
    for duplicate in table.duplicate_sources() {
        warn!(
            path = %path.display(),
            source = %duplicate,
            "exact-map source listed more than once; later entries never match"
        );
    }
    tracing::debug!(path = %path.display(), entries = table.len(), "loaded exact map");
    Ok(table)
}
