//! TOML run configuration.
//!
//! ```toml
//! [columns]
//! insurance_plan = "Insurance Name Plan1"
//! diagnosis_prefix = "Diagnosis"
//! procedure_code = "Procedure Code"
//! source = "Source"
//!
//! [tables]
//! substitution_rules = "rules/insurance.csv"
//! exact_map = "rules/diagnosis.csv"
//!
//! [categories]
//! whitelist = ["99213", "99214"]
//! include_unobserved_whitelist = false
//!
//! [[fee_schedules]]
//! source = "Medicare FL"
//! path = "fees/medicare.csv"
//! procedure_column = "PROCEDURE"
//! amount_column = "PAR  AMOUNT"
//! modifier_column = "MOD"
//! filters = [
//!     { op = "not_equals", column = "NOTE", value = "#" },
//!     { op = "not_null", column = "PROCEDURE" },
//! ]
//! ```
//!
//! Every section is optional. Relative table and fee schedule paths resolve
//! against the directory the configuration file lives in.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use medmap_model::{
    CategoryOptions, CategoryWhitelist, ColumnLayout, FeeScheduleSource, ModelError,
};

use crate::error::{IngestError, Result};

/// Locations of the rule tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    pub substitution_rules: Option<PathBuf>,
    pub exact_map: Option<PathBuf>,
}

/// Category whitelist and table options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryConfig {
    /// Replaces the built-in whitelist when set.
    pub whitelist: Option<Vec<String>>,
    pub include_unobserved_whitelist: bool,
}

impl CategoryConfig {
    /// The configured whitelist, or the built-in one.
    pub fn whitelist(&self) -> std::result::Result<CategoryWhitelist, ModelError> {
        match &self.whitelist {
            Some(codes) => CategoryWhitelist::from_codes(codes.iter().map(String::as_str)),
            None => Ok(CategoryWhitelist::default()),
        }
    }

    pub fn options(&self) -> CategoryOptions {
        CategoryOptions {
            include_unobserved_whitelist: self.include_unobserved_whitelist,
        }
    }
}

/// Everything a run can be configured with from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub columns: ColumnLayout,
    pub tables: TableConfig,
    pub categories: CategoryConfig,
    /// Payer fee schedules merged by `medmap fee-schedule`.
    pub fee_schedules: Vec<FeeScheduleSource>,
}

impl RunConfig {
    /// Check the parts of the configuration that can be checked without data.
    pub fn validate(&self, path: &Path) -> Result<()> {
        self.categories
            .whitelist()
            .map_err(|source| IngestError::InvalidWhitelist {
                path: path.to_path_buf(),
                source,
            })?;

        let mut tags = BTreeSet::new();
        for schedule in &self.fee_schedules {
            let invalid = |message: &str| IngestError::InvalidFeeSchedule {
                path: path.to_path_buf(),
                source_tag: schedule.source.clone(),
                message: message.to_string(),
            };
            if schedule.source.trim().is_empty() {
                return Err(invalid("source tag is empty"));
            }
            if schedule.procedure_column.trim().is_empty()
                || schedule.amount_column.trim().is_empty()
            {
                return Err(invalid("procedure and amount columns are required"));
            }
            if !tags.insert(schedule.source.trim()) {
                return Err(invalid("source tag is listed more than once"));
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for slot in [
            &mut self.tables.substitution_rules,
            &mut self.tables.exact_map,
        ] {
            if let Some(table) = slot.as_mut()
                && table.is_relative()
            {
                *table = base.join(&*table);
            }
        }
        for schedule in &mut self.fee_schedules {
            if schedule.path.is_relative() {
                schedule.path = base.join(&schedule.path);
            }
        }
    }
}

/// Parse a run configuration file.
pub fn load_run_config(path: &Path) -> Result<RunConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let mut config: RunConfig = toml::from_str(&contents).map_err(|e| IngestError::Toml {
        path: path.to_path_buf(),
        source: e,
    })?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    config.validate(path)?;
    Ok(config)
}
