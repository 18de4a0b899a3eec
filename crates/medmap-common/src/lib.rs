//! Shared utilities for medmap crates.
//!
//! This crate provides the helpers every stage needs: turning Polars cell values
//! into text and the title-case/whitespace normalization used for exact-map lookups.

pub mod polars;
pub mod text;

// Re-export commonly used functions at crate root for convenience
pub use polars::{MISSING_TEXT, any_to_string, any_to_text, format_numeric};
pub use text::{collapse_whitespace, normalize_label, title_case};
