use std::path::PathBuf;

use medmap_ingest::RunConfig;
use medmap_model::{
    CategoryAssignment, CategoryOptions, CategoryWhitelist, ColumnLayout, ConflictReport,
    ExactMapTable, ModelError, RunSummary, SourceSummary, SubstitutionTable,
};
use medmap_transform::CascadeHazard;

/// Everything one run needs, after configuration and flags are merged.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub layout: ColumnLayout,
    pub substitution_rules: Option<PathBuf>,
    pub exact_map: Option<PathBuf>,
    pub whitelist: CategoryWhitelist,
    pub category_options: CategoryOptions,
    /// Report without writing any output file.
    pub dry_run: bool,
}

impl RunSettings {
    /// Settings taken from a run configuration.
    pub fn from_config(
        config: RunConfig,
        inputs: Vec<PathBuf>,
        output_dir: PathBuf,
    ) -> Result<Self, ModelError> {
        let whitelist = config.categories.whitelist()?;
        let category_options = config.categories.options();
        Ok(Self {
            inputs,
            output_dir,
            layout: config.columns,
            substitution_rules: config.tables.substitution_rules,
            exact_map: config.tables.exact_map,
            whitelist,
            category_options,
            dry_run: false,
        })
    }
}

/// Outcome of a run.
#[derive(Debug)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub summary: RunSummary,
    pub conflicts: ConflictReport,
    pub categories: Vec<CategoryAssignment>,
    /// Conflict report, category table and summary paths, when written.
    pub reports: Vec<PathBuf>,
}

/// Outcome of merging fee schedules.
#[derive(Debug)]
pub struct FeeScheduleResult {
    /// Rows in the merged schedule.
    pub records: usize,
    /// Kept rows and input file per payer, in configuration order.
    pub sources: Vec<SourceSummary>,
    /// The merged schedule, when written.
    pub output: Option<PathBuf>,
}

/// Loaded rule tables and everything suspicious about them.
#[derive(Debug)]
pub struct RuleCheck {
    pub substitutions: SubstitutionTable,
    pub exact_map: ExactMapTable,
    pub whitelist: CategoryWhitelist,
    pub hazards: Vec<CascadeHazard>,
    pub duplicate_sources: Vec<String>,
}

impl RuleCheck {
    pub fn is_clean(&self) -> bool {
        self.hazards.is_empty() && self.duplicate_sources.is_empty()
    }
}
