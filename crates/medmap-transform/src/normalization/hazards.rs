//! Diagnostics for rule tables whose entries feed into each other.
//!
//! Rule application is cascading on purpose, so none of these are errors. They
//! point at rules that either rewrite a value twice in one pass, or would
//! rewrite the pipeline's own output if it were run again.

use std::fmt;

use medmap_common::normalize_label;
use medmap_model::{ExactMapTable, SubstitutionTable};

/// Which table a hazard was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleTableKind {
    Substitution,
    ExactMap,
}

impl RuleTableKind {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Substitution => "substitution",
            Self::ExactMap => "exact-map",
        }
    }
}

/// How two entries interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardKind {
    /// A later entry matches an earlier entry's output in the same pass.
    Chained,
    /// An earlier entry matches a later entry's output, so a second run over
    /// normalized data changes it again.
    Unstable,
    /// An exact-map destination is not in normalized form and is rewritten by
    /// normalization on a second run.
    UnnormalizedDestination,
}

impl HazardKind {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Chained => "chained",
            Self::Unstable => "unstable",
            Self::UnnormalizedDestination => "unnormalized destination",
        }
    }
}

/// One interaction between table entries, by zero-based row index.
///
/// `from` produces the value, `to` consumes it. For
/// [`HazardKind::UnnormalizedDestination`] both point at the same entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeHazard {
    pub table: RuleTableKind,
    pub kind: HazardKind,
    pub from: usize,
    pub to: usize,
}

impl fmt::Display for CascadeHazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            HazardKind::UnnormalizedDestination => write!(
                f,
                "{} entry {}: destination is not in normalized form",
                self.table.display_name(),
                self.from + 1
            ),
            kind => write!(
                f,
                "{} entry {} output is matched by entry {} ({})",
                self.table.display_name(),
                self.from + 1,
                self.to + 1,
                kind.display_name()
            ),
        }
    }
}

/// Find substitution rules whose replacement contains another rule's pattern.
pub fn find_substitution_hazards(table: &SubstitutionTable) -> Vec<CascadeHazard> {
    let rules = table.rules();
    let mut hazards = Vec::new();
    for (from, producer) in rules.iter().enumerate() {
        let produced = producer.replacement.to_lowercase();
        for (to, consumer) in rules.iter().enumerate() {
            if from == to || !produced.contains(consumer.pattern.as_str()) {
                continue;
            }
            // Rewriting into the same replacement again is harmless.
            if consumer.replacement == producer.replacement {
                continue;
            }
            let kind = if to > from {
                HazardKind::Chained
            } else {
                HazardKind::Unstable
            };
            hazards.push(CascadeHazard {
                table: RuleTableKind::Substitution,
                kind,
                from,
                to,
            });
        }
    }
    hazards
}

/// Find exact-map entries whose destination is another entry's source, and
/// destinations that normalization would rewrite.
pub fn find_exact_map_hazards(table: &ExactMapTable) -> Vec<CascadeHazard> {
    let entries = table.entries();
    let mut hazards = Vec::new();
    for (from, producer) in entries.iter().enumerate() {
        if !producer.destination_is_normalized() {
            hazards.push(CascadeHazard {
                table: RuleTableKind::ExactMap,
                kind: HazardKind::UnnormalizedDestination,
                from,
                to: from,
            });
        }
        let renormalized = normalize_label(&producer.destination);
        for (to, consumer) in entries.iter().enumerate() {
            if from == to || consumer.destination == producer.destination {
                continue;
            }
            let kind = if to > from && producer.destination == consumer.source {
                HazardKind::Chained
            } else if renormalized == consumer.source {
                HazardKind::Unstable
            } else {
                continue;
            };
            hazards.push(CascadeHazard {
                table: RuleTableKind::ExactMap,
                kind,
                from,
                to,
            });
        }
    }
    hazards
}
