pub mod codes;
pub mod error;
pub mod fees;
pub mod layout;
pub mod rules;
pub mod summary;
pub mod whitelist;

pub use codes::{CategoryAssignment, ConflictGroup, ConflictReport, ExtractedCode, OTHERS_CATEGORY};
pub use error::{ModelError, Result};
pub use fees::{
    DEFAULT_MISSING_MODIFIERS, FEE_AMOUNT_COLUMN, FEE_KEY_COLUMN, FEE_PROCEDURE_COLUMN,
    FEE_SOURCE_COLUMN, FeeScheduleSource, RowFilter,
};
pub use layout::{CategoryOptions, ColumnLayout};
pub use rules::{
    ExactMapEntry, ExactMapTable, NormalizationTables, SubstitutionRule, SubstitutionTable,
};
pub use summary::{RunSummary, SourceSummary};
pub use whitelist::{CategoryWhitelist, DEFAULT_CATEGORY_WHITELIST};
