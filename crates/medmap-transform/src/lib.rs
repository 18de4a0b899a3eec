//! Normalization engine for multi-source billing exports.
//!
//! - **normalization**: ordered substitution rules and exact-map lookups, plus
//!   diagnostics for rule tables whose entries feed into each other
//! - **extract**: bracketed code extraction from free text
//! - **conflicts**: codes seen with more than one description
//! - **category**: whitelist categories with a shared "Others" bucket
//! - **batch**: applying all of the above to a record batch
//! - **frame**: source-tagged batches, combining and splitting them
//! - **fees**: payer fee schedules filtered, keyed and merged
//!
//! Every function here is a pure function of its inputs and the rule tables;
//! nothing keeps state between calls.

pub mod batch;
pub mod category;
pub mod conflicts;
pub mod data_utils;
mod error;
pub mod extract;
pub mod fees;
pub mod frame;
pub mod normalization;

pub use batch::{
    NormalizationStats, NormalizedBatch, collect_diagnosis_codes, normalize_batch,
    observed_procedure_codes,
};
pub use category::assign_categories;
pub use conflicts::{detect_conflicts, group_codes};
pub use error::TransformError;
pub use extract::{extract_code, extract_codes};
pub use fees::{apply_row_filters, combine_fee_schedules, prepare_fee_schedule};
pub use frame::{
    SourceFrame, SourceFrameMeta, combine_source_frames, drop_empty_rows, split_by_source,
};
pub use normalization::{
    CascadeHazard, HazardKind, RuleTableKind, apply_exact_map, apply_substitutions,
    find_exact_map_hazards, find_substitution_hazards,
};
