//! Text normalization against the run's mapping tables.
//!
//! - **substitution**: ordered "contains -> replace" rules for free text
//! - **exact_map**: title-case/trim then exact lookup replacement
//! - **hazards**: rules whose output is consumed by other rules

pub mod exact_map;
pub mod hazards;
pub mod substitution;

pub use exact_map::apply_exact_map;
pub use hazards::{
    CascadeHazard, HazardKind, RuleTableKind, find_exact_map_hazards, find_substitution_hazards,
};
pub use substitution::apply_substitutions;
