//! Output writers for medmap runs.
//!
//! - **partitions**: normalized records, one CSV per source tag
//! - **reports**: conflict report, procedure category table, JSON run summary,
//!   merged fee schedule

mod common;
mod error;
mod partitions;
mod reports;

pub use common::{
    CATEGORY_TABLE_FILE, CONFLICT_REPORT_FILE, FEE_SCHEDULE_FILE, RUN_SUMMARY_FILE,
    ensure_output_dir, partition_file_name,
};
pub use error::{OutputError, Result};
pub use partitions::{partition_file_names, write_frame_csv, write_source_partitions};
pub use reports::{
    write_category_table, write_conflict_report, write_fee_schedule, write_run_summary,
};
