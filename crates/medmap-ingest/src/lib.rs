//! Input loading for medmap runs.
//!
//! # Features
//!
//! - **Source tables**: billing exports read with every column as text, tagged
//!   with the directory they came from
//! - **Rule tables**: ordered substitution rules and exact-map entries from CSV
//! - **Fee schedules**: payer schedules read as text below an optional preamble
//! - **Run configuration**: optional TOML file naming columns, tables, the
//!   category whitelist and the fee schedule layouts

mod config;
mod error;
mod rules;
mod source;

// === Error Types ===
pub use error::{IngestError, Result};

// === Source Tables ===
pub use source::{SourceFile, read_fee_schedule_table, read_source_table, source_tag};

// === Rule Tables ===
pub use rules::{
    DESTINATION_HEADER, PATTERN_HEADER, REPLACEMENT_HEADER, SOURCE_HEADER, load_exact_map_table,
    load_substitution_table,
};

// === Configuration ===
pub use config::{CategoryConfig, RunConfig, TableConfig, load_run_config};
